// Status and category enums shared by entities, validation and storage

use crate::domain::contract::to_cents;
use crate::domain::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Enum with a fixed string form per variant
pub trait WireEnum: Copy + std::str::FromStr + 'static {
    fn variants() -> &'static [Self];

    fn wire(&self) -> &'static str;

    /// `"A"|"B"|"C"` listing used in validation messages
    fn expected() -> String {
        Self::variants()
            .iter()
            .map(|v| format!("\"{}\"", v.wire()))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Declares a `Copy` enum whose wire form is a fixed string per variant.
///
/// The wire string is what gets stored in SQLite, accepted from drafts and
/// emitted by serde, so renaming a variant never changes persisted data.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl WireEnum for $name {
            fn variants() -> &'static [Self] {
                Self::ALL
            }

            fn wire(&self) -> &'static str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(DomainError::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                        expected: <Self as WireEnum>::expected(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// Account role
    UserRole {
        Admin => "ADMIN",
        Company => "COMPANY",
        Talent => "TALENT",
    }
}

wire_enum! {
    JobCategory {
        EventManagement => "Event Management",
        Hospitality => "Hospitality",
        Photography => "Photography",
        Catering => "Catering",
        Security => "Security",
        Cleaning => "Cleaning",
        TechnicalSupport => "Technical Support",
        CustomerService => "Customer Service",
    }
}

wire_enum! {
    PayType {
        Hourly => "HOURLY",
        Daily => "DAILY",
        Fixed => "FIXED",
    }
}

wire_enum! {
    JobStatus {
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

wire_enum! {
    ApplicationStatus {
        Pending => "PENDING",
        Shortlisted => "SHORTLISTED",
        Rejected => "REJECTED",
        Hired => "HIRED",
    }
}

wire_enum! {
    ContractStatus {
        Active => "ACTIVE",
        Completed => "COMPLETED",
        Terminated => "TERMINATED",
    }
}

wire_enum! {
    PaymentStatus {
        Pending => "PENDING",
        PartiallyPaid => "PARTIALLY_PAID",
        Paid => "PAID",
        Refunded => "REFUNDED",
    }
}

wire_enum! {
    /// Support ticket lifecycle
    TicketStatus {
        Open => "OPEN",
        InProgress => "IN_PROGRESS",
        Resolved => "RESOLVED",
        Closed => "CLOSED",
    }
}

wire_enum! {
    TicketPriority {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Talent
    }
}

impl Default for PayType {
    fn default() -> Self {
        PayType::Fixed
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Open
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Pending
    }
}

impl Default for ContractStatus {
    fn default() -> Self {
        ContractStatus::Active
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Open
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Medium
    }
}

impl PaymentStatus {
    /// Status implied by the amount paid so far against the contract total
    pub fn for_amounts(amount_paid: f64, total_amount: f64) -> Self {
        let (paid, total) = (to_cents(amount_paid), to_cents(total_amount));
        if paid <= 0 {
            PaymentStatus::Pending
        } else if paid >= total {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        }
    }
}
