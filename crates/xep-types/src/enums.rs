use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

// ── Macro for wire-string enum boilerplate ────────────────────────────
//
// Enumerated attributes are a fixed set of named variants, each spelled
// one way on the wire, plus a conversion pair (as_wire / from_wire). The
// macro keeps each enum's docs and derives explicit at the call site.

macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident as $field:literal {
      $( $(#[$vmeta:meta])* $variant:ident = $wire:literal ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// The variant's wire spelling.
      pub fn as_wire(self) -> &'static str {
        match self {
          $( Self::$variant => $wire ),+
        }
      }

      /// Parse a wire spelling.
      ///
      /// Returns `Err(DecodeError::InvalidEnumValue)` if the value
      /// doesn't match any known variant.
      pub fn from_wire(value: &str) -> Result<Self, DecodeError> {
        match value {
          $( $wire => Ok(Self::$variant), )+
          other => Err(DecodeError::InvalidEnumValue {
            field: $field,
            value: other.to_owned(),
          }),
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
      }
    }
  };
}

// ── Action ────────────────────────────────────────────────────────────

wire_enum! {
  /// Change notification carried on a pushed external service.
  ///
  /// ```text
  /// ┌────────┬──────────────────────────────────┐
  /// │ Wire   │ Meaning                          │
  /// ├────────┼──────────────────────────────────┤
  /// │ add    │ service became available         │
  /// │ remove │ service is no longer offered     │
  /// │ modify │ service details changed          │
  /// └────────┴──────────────────────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
  #[serde(rename_all = "lowercase")]
  pub enum Action as "action" {
    Add = "add",
    Remove = "remove",
    Modify = "modify",
  }
}

// ── IqType ────────────────────────────────────────────────────────────

wire_enum! {
  /// The `type` attribute of an `iq` stanza.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
  #[serde(rename_all = "lowercase")]
  pub enum IqType as "type" {
    Get = "get",
    Set = "set",
    Result = "result",
    Error = "error",
  }
}

impl IqType {
  /// Requests (`get`/`set`) carry exactly one payload element.
  pub fn is_request(self) -> bool {
    matches!(self, Self::Get | Self::Set)
  }
}

// ── StanzaKind ────────────────────────────────────────────────────────

wire_enum! {
  /// Top-level stanza element names on a client stream.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
  #[serde(rename_all = "lowercase")]
  pub enum StanzaKind as "stanza" {
    Iq = "iq",
    Message = "message",
    Presence = "presence",
  }
}
