use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{NewOrder, NewOrderLine};
use crate::utils::error::AppError;

pub const ORDER_CREATED_MESSAGE: &str = "Order successfully added";

const NAIVE_DATE_TIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Raw `POST /orders` payload. Fields stay untyped until [`validate`] so that
/// every malformed body is rejected the same way.
///
/// [`validate`]: CreateOrderRequest::validate
#[derive(Debug, Clone, Default)]
pub struct CreateOrderRequest {
    pub event_id: Value,
    pub event_date: Value,
    pub user_id: Value,
    pub ticket_types: Value,
}

#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub generated_barcodes: Vec<String>,
    pub message: &'static str,
}

impl OrderCreated {
    pub fn new(generated_barcodes: Vec<String>) -> Self {
        Self {
            generated_barcodes,
            message: ORDER_CREATED_MESSAGE,
        }
    }
}

fn invalid(reason: impl Into<String>) -> AppError {
    AppError::InvalidInput(reason.into())
}

impl CreateOrderRequest {
    /// Reads the body as JSON. Anything other than an object is treated as
    /// an object with no fields, which then fails validation.
    pub fn from_slice(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);
        Self {
            event_id: take("event_id"),
            event_date: take("event_date"),
            user_id: take("user_id"),
            ticket_types: take("ticket_types"),
        }
    }

    pub fn validate(&self) -> Result<NewOrder, AppError> {
        let required = [
            ("event_id", &self.event_id),
            ("event_date", &self.event_date),
            ("user_id", &self.user_id),
            ("ticket_types", &self.ticket_types),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| is_blank(value)) {
            return Err(invalid(format!("{name} is missing or empty")));
        }

        let event_id = integer(&self.event_id).ok_or_else(|| invalid("event_id is not an integer"))?;
        let user_id = integer(&self.user_id).ok_or_else(|| invalid("user_id is not an integer"))?;
        let event_date =
            parse_event_date(&self.event_date).ok_or_else(|| invalid("event_date is not a date"))?;

        let Value::Array(entries) = &self.ticket_types else {
            return Err(invalid("ticket_types is not a list"));
        };
        let lines = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                ticket_line(entry).ok_or_else(|| invalid(format!("ticket_types[{index}] is malformed")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewOrder {
            event_id,
            event_date,
            user_id,
            lines,
        })
    }
}

/// `null`, `false`, zero, `""`, `"0"` and empty containers count as not provided.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Accepts JSON integers and strings holding an integer.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn ticket_line(entry: &Value) -> Option<NewOrderLine> {
    let fields = entry.as_object()?;
    let ticket_type_id = integer(fields.get("ticket_type_id")?)?;
    let quantity = integer(fields.get("quantity")?)?;
    Some(NewOrderLine::new(ticket_type_id, quantity))
}

/// RFC 3339, or a naive date/date-time taken as UTC.
pub fn parse_event_date(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn request(body: Value) -> CreateOrderRequest {
        CreateOrderRequest::from_slice(body.to_string().as_bytes())
    }

    fn valid_body() -> Value {
        json!({
            "event_id": 3,
            "event_date": "2024-08-21 13:00:00",
            "user_id": 451,
            "ticket_types": [
                {"ticket_type_id": 1, "quantity": 2},
                {"ticket_type_id": 2, "quantity": 1}
            ]
        })
    }

    #[test]
    fn test_valid_request() {
        let order = request(valid_body()).validate().unwrap();
        assert_eq!(order.event_id, 3);
        assert_eq!(order.user_id, 451);
        assert_eq!(order.event_date.hour(), 13);
        assert_eq!(
            order.lines,
            vec![NewOrderLine::new(1, 2), NewOrderLine::new(2, 1)]
        );
    }

    #[test]
    fn test_each_required_field_is_checked() {
        for field in ["event_id", "event_date", "user_id", "ticket_types"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let err = request(body).validate().unwrap_err();
            assert!(
                matches!(err, AppError::InvalidInput(_)),
                "missing {field} should be rejected"
            );
        }
    }

    #[test]
    fn test_blank_values_are_rejected() {
        for blank in [json!(null), json!(""), json!("0"), json!(0), json!(false), json!([]), json!({})] {
            let mut body = valid_body();
            body["user_id"] = blank.clone();
            assert!(
                request(body).validate().is_err(),
                "{blank} should count as empty"
            );
        }
    }

    #[test]
    fn test_string_ids_are_accepted() {
        let mut body = valid_body();
        body["event_id"] = json!("12");
        body["ticket_types"] = json!([{"ticket_type_id": "5", "quantity": "4"}]);
        let order = request(body).validate().unwrap();
        assert_eq!(order.event_id, 12);
        assert_eq!(order.lines, vec![NewOrderLine::new(5, 4)]);
    }

    #[test]
    fn test_quantities_are_not_range_checked() {
        let mut body = valid_body();
        body["ticket_types"] = json!([
            {"ticket_type_id": 1, "quantity": 0},
            {"ticket_type_id": 2, "quantity": -3}
        ]);
        let order = request(body).validate().unwrap();
        assert_eq!(order.lines[0].quantity, 0);
        assert_eq!(order.lines[1].quantity, -3);
        assert_eq!(order.ticket_count(), Some(0));
    }

    #[test]
    fn test_malformed_ticket_types() {
        for ticket_types in [
            json!("adult"),
            json!([{"ticket_type_id": 1}]),
            json!([{"quantity": 1}]),
            json!([7]),
            json!([{"ticket_type_id": "vip", "quantity": 1}]),
        ] {
            let mut body = valid_body();
            body["ticket_types"] = ticket_types.clone();
            assert!(
                request(body).validate().is_err(),
                "{ticket_types} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_object_bodies() {
        for raw in ["", "not json", "[1, 2, 3, 4]", "42"] {
            let req = CreateOrderRequest::from_slice(raw.as_bytes());
            assert!(req.validate().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_event_date_formats() {
        let rfc = parse_event_date(&json!("2024-08-21T13:00:00+02:00")).unwrap();
        assert_eq!(rfc.hour(), 11);

        let naive = parse_event_date(&json!("2024-08-21T09:30:00")).unwrap();
        assert_eq!(naive.minute(), 30);

        let date_only = parse_event_date(&json!("2024-08-21")).unwrap();
        assert_eq!(date_only.day(), 21);
        assert_eq!(date_only.hour(), 0);

        let minutes = parse_event_date(&json!("2024-08-21 13:05")).unwrap();
        assert_eq!((minutes.hour(), minutes.minute(), minutes.second()), (13, 5, 0));

        let minutes_t = parse_event_date(&json!("2024-08-21T13:05")).unwrap();
        assert_eq!(minutes_t, minutes);

        let millis = parse_event_date(&json!("2024-08-21T13:00:00.000")).unwrap();
        assert_eq!(millis.hour(), 13);
        assert_eq!(millis.nanosecond(), 0);

        let half = parse_event_date(&json!("2024-08-21 13:00:00.5")).unwrap();
        assert_eq!(half.nanosecond(), 500_000_000);

        assert!(parse_event_date(&json!("next friday")).is_none());
        assert!(parse_event_date(&json!(20240821)).is_none());
    }
}
