use serde::{Deserialize, Serialize};

/// Macro to generate a serde enum with an `as_str` and `Display` pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Staff may store other status strings; these are the ones the service itself sets or counts.
str_enum!(AppointmentStatus {
    Pending => "Pending",
    Confirmed => "Confirmed",
    Cancelled => "Cancelled",
});

str_enum!(BillingStatus {
    Unpaid => "Unpaid",
    Paid => "Paid",
});

str_enum!(Role {
    Patient => "patient",
    Staff => "staff",
});
