//! Domain models for sale records as delivered by the sales feed.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::ProfitPolicy;

/// A single sale as reported upstream. Immutable input to every aggregation.
///
/// Numeric fields stay optional so a missing value can be told apart from an
/// explicit zero; all readers treat `None` as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    #[serde(default, deserialize_with = "lenient::opaque_id")]
    pub id: String,
    #[serde(
        default,
        alias = "order_date",
        deserialize_with = "lenient::order_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub cogs: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub profit: Option<Decimal>,
    #[serde(default, alias = "payment_method", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: SaleStatus,
}

impl SaleRecord {
    pub fn new(id: impl Into<String>, order_date: Option<NaiveDate>, total: Decimal) -> Self {
        Self {
            id: id.into(),
            order_date,
            total: Some(total),
            cogs: None,
            profit: None,
            payment_method: None,
            status: SaleStatus::Completed,
        }
    }

    pub fn with_profit(mut self, profit: Decimal) -> Self {
        self.profit = Some(profit);
        self
    }

    pub fn with_cogs(mut self, cogs: Decimal) -> Self {
        self.cogs = Some(cogs);
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn revenue(&self) -> Decimal {
        self.total.unwrap_or_default()
    }

    pub fn cost(&self) -> Decimal {
        self.cogs.unwrap_or_default()
    }

    /// Reads the record's profit under the given policy.
    pub fn profit_with(&self, policy: ProfitPolicy) -> Decimal {
        match (self.profit, policy) {
            (Some(profit), _) => profit,
            (None, ProfitPolicy::AsSupplied) => Decimal::ZERO,
            (None, ProfitPolicy::DeriveFromCogs) => self.revenue().saturating_sub(self.cost()),
        }
    }

    pub fn method(&self) -> PaymentMethod {
        PaymentMethod::parse(self.payment_method.as_deref())
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }
}

/// Tender used to settle a sale. The set is open: unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Cod,
    Term,
    Cheque,
    Online,
    Other(String),
}

impl PaymentMethod {
    /// Methods that always appear in a breakdown, in display order.
    pub const BASELINE: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Cod,
        PaymentMethod::Term,
        PaymentMethod::Cheque,
        PaymentMethod::Online,
    ];

    /// Normalizes a raw tag. Absent or blank tags count as cash.
    pub fn parse(raw: Option<&str>) -> Self {
        let normalized = raw.map(|value| value.trim().to_ascii_lowercase());
        match normalized.as_deref() {
            None | Some("") | Some("cash") => PaymentMethod::Cash,
            Some("cod") => PaymentMethod::Cod,
            Some("term") => PaymentMethod::Term,
            Some("cheque") => PaymentMethod::Cheque,
            Some("online") => PaymentMethod::Online,
            Some(other) => PaymentMethod::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Cod => "cod",
            PaymentMethod::Term => "term",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Online => "online",
            PaymentMethod::Other(tag) => tag,
        }
    }

    pub fn is_baseline(&self) -> bool {
        !matches!(self, PaymentMethod::Other(_))
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        PaymentMethod::parse(Some(&value))
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Processing,
    Completed,
    Delivered,
    Cancelled,
    #[default]
    #[serde(other)]
    Other,
}

/// Forgiving decoders: malformed upstream fields degrade to `None` instead of failing the payload.
mod lenient {
    use std::{fmt, str::FromStr};

    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use rust_decimal::{prelude::FromPrimitive, Decimal};
    use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

    pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(stamp.date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|stamp| stamp.date())
    }

    macro_rules! ignore_compound {
        ($de:lifetime) => {
            fn visit_seq<A: SeqAccess<$de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Default::default())
            }

            fn visit_map<A: MapAccess<$de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Default::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Default::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Default::default())
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
                Ok(Default::default())
            }
        };
    }

    struct DateVisitor;

    impl<'de> Visitor<'de> for DateVisitor {
        type Value = Option<NaiveDate>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a calendar date or timestamp string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(parse_order_date(value))
        }

        fn visit_some<D: Deserializer<'de>>(self, inner: D) -> Result<Self::Value, D::Error> {
            inner.deserialize_any(DateVisitor)
        }

        fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
            Ok(None)
        }

        ignore_compound!('de);
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(Decimal::from_str(value.trim()).ok())
        }

        fn visit_some<D: Deserializer<'de>>(self, inner: D) -> Result<Self::Value, D::Error> {
            inner.deserialize_any(AmountVisitor)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(value)))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(Decimal::from_f64(value))
        }

        ignore_compound!('de);
    }

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or numeric identifier")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_some<D: Deserializer<'de>>(self, inner: D) -> Result<Self::Value, D::Error> {
            inner.deserialize_any(IdVisitor)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        ignore_compound!('de);
    }

    pub fn order_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        deserializer.deserialize_any(DateVisitor)
    }

    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    pub fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

pub use lenient::parse_order_date;
