//! Public wrapper state machine.
//!
//! `Generating -> PrivateEmitted -> PublicEligible | PublicSuppressed`

use std::fmt;

use convgen_core::TypeName;

/// Why a public wrapper isn't emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// An exported hand-written conversion already covers the pair.
    ManualConversion(TypeName),
    /// The type carries `+<tag>=no-public`.
    NoPublic(TypeName),
    /// The private function has this many field errors.
    FieldErrors(usize),
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuppressReason::ManualConversion(function) => {
                write!(f, "manual conversion {function} exists")
            }
            SuppressReason::NoPublic(ty) => write!(f, "{ty} opted out of public conversions"),
            SuppressReason::FieldErrors(1) => f.write_str("1 field error"),
            SuppressReason::FieldErrors(count) => write!(f, "{count} field errors"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WrapperState {
    #[default]
    Generating,
    PrivateEmitted,
    PublicEligible,
    PublicSuppressed(SuppressReason),
}

impl WrapperState {
    pub fn private_emitted(self) -> Self {
        match self {
            WrapperState::Generating => WrapperState::PrivateEmitted,
            other => panic!("private function emitted twice (state: {other:?})"),
        }
    }

    pub fn decide(self, suppressed: Option<SuppressReason>) -> Self {
        match self {
            WrapperState::PrivateEmitted => match suppressed {
                Some(reason) => WrapperState::PublicSuppressed(reason),
                None => WrapperState::PublicEligible,
            },
            other => panic!("public wrapper decided before the private function (state: {other:?})"),
        }
    }

    pub fn emits_public(&self) -> bool {
        matches!(self, WrapperState::PublicEligible)
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            WrapperState::PublicEligible | WrapperState::PublicSuppressed(_)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            WrapperState::Generating => "generating",
            WrapperState::PrivateEmitted => "private",
            WrapperState::PublicEligible => "public",
            WrapperState::PublicSuppressed(_) => "suppressed",
        }
    }
}
