//! Ready-made demo functions: clock, canned weather, mail stub, arithmetic,
//! unit conversion, a small user directory and mock sales figures.

use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use rand::Rng;
use serde_json::{json, Value};
use tracing::info;

use super::registry::ToolRegistry;
use super::tool::{FunctionTool, Tool};
use super::types::FunctionParameters;
use crate::error::FoundryError;

const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Records returned by [`get_sales_data`].
pub const SALES_RECORDS: usize = 10;

pub fn fetch_current_datetime() -> FunctionTool {
    FunctionTool::from_fn(
        "fetch_current_datetime",
        "Get the current local time as a JSON string, optionally formatted.",
        FunctionParameters::object()
            .string(
                "format",
                "strftime format of the returned time. Defaults to '%Y-%m-%d %H:%M:%S'.",
                false,
            )
            .build(),
        |args| {
            let format = args.get_str_opt("format").unwrap_or(DEFAULT_TIME_FORMAT);
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(FoundryError::InvalidArgument(format!(
                    "Invalid time format: {format}"
                )));
            }
            let now = chrono::Local::now().format(format).to_string();
            Ok(json!({ "current_time": now }))
        },
    )
}

pub fn fetch_weather() -> FunctionTool {
    FunctionTool::from_fn(
        "fetch_weather",
        "Fetches the weather information for the specified location.",
        FunctionParameters::object()
            .string("location", "The location to fetch weather for.", true)
            .build(),
        |args| {
            let weather = match args.get_str("location")? {
                "New York" => "Sunny, 25°C",
                "London" => "Cloudy, 18°C",
                "Tokyo" => "Rainy, 22°C",
                _ => "Weather data not available for this location.",
            };
            Ok(json!({ "weather": weather }))
        },
    )
}

/// Pretends to send a mail; the message is only logged.
pub fn send_email() -> FunctionTool {
    FunctionTool::from_fn(
        "send_email",
        "Sends an email with the specified subject and body to the recipient.",
        FunctionParameters::object()
            .string("recipient", "Email address of the recipient.", true)
            .string("subject", "Subject of the email.", true)
            .string("body", "Body content of the email.", true)
            .build(),
        |args| {
            let recipient = args.get_str("recipient")?;
            info!(
                recipient,
                subject = args.get_str("subject")?,
                body = args.get_str("body")?,
                "Sending email"
            );
            Ok(json!({ "message": format!("Email successfully sent to {recipient}.") }))
        },
    )
}

pub fn calculate_sum() -> FunctionTool {
    FunctionTool::from_fn(
        "calculate_sum",
        "Calculates the sum of two integers.",
        FunctionParameters::object()
            .integer("a", "First integer.", true)
            .integer("b", "Second integer.", true)
            .build(),
        |args| {
            let a = args.get_i64("a")?;
            let b = args.get_i64("b")?;
            let result = a.checked_add(b).ok_or_else(|| {
                FoundryError::InvalidArgument(format!("{a} + {b} overflows"))
            })?;
            Ok(json!({ "result": result }))
        },
    )
}

pub fn convert_temperature() -> FunctionTool {
    FunctionTool::from_fn(
        "convert_temperature",
        "Converts temperature from Celsius to Fahrenheit.",
        FunctionParameters::object()
            .number("celsius", "Temperature in Celsius.", true)
            .build(),
        |args| {
            let celsius = args.get_f64("celsius")?;
            Ok(json!({ "fahrenheit": celsius * 9.0 / 5.0 + 32.0 }))
        },
    )
}

pub fn get_user_info() -> FunctionTool {
    FunctionTool::from_fn(
        "get_user_info",
        "Retrieves user information based on user ID.",
        FunctionParameters::object()
            .integer("user_id", "ID of the user.", true)
            .build(),
        |args| Ok(json!({ "user_info": lookup_user(args.get_i64("user_id")?) })),
    )
}

fn lookup_user(user_id: i64) -> Value {
    let (name, email) = match user_id {
        1 => ("Alice", "alice@example.com"),
        2 => ("Bob", "bob@example.com"),
        3 => ("Charlie", "charlie@example.com"),
        _ => return json!({ "error": "User not found." }),
    };
    json!({ "name": name, "email": email })
}

/// Random sales records for a year. The year is only logged.
pub fn get_sales_data() -> FunctionTool {
    FunctionTool::from_fn(
        "get_sales_data",
        "Get product sales data for a given year.",
        FunctionParameters::object()
            .integer("year", "The year for which to get the sales data.", true)
            .build(),
        |args| {
            let year = args.get_i64("year")?;
            info!(year, "Getting sales data");
            Ok(Value::Array(mock_sales(
                &mut rand::thread_rng(),
                SALES_RECORDS,
            )))
        },
    )
}

fn mock_sales<R: Rng>(rng: &mut R, count: usize) -> Vec<Value> {
    (1..=count)
        .map(|id| {
            let quantity_sold: u32 = rng.gen_range(1..=100);
            let cost_price = round_cents(rng.gen_range(5.0..=50.0));
            let selling_price = round_cents(rng.gen_range(10.0..=100.0));
            json!({
                "id": id,
                "product": format!("Product {id}"),
                "quantity_sold": quantity_sold,
                "cost_price": cost_price,
                "selling_price": selling_price,
                "profit": round_cents((selling_price - cost_price) * f64::from(quantity_sold)),
            })
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Functions for the sales chat: [`get_sales_data`] only.
pub fn sales_functions() -> Result<ToolRegistry, FoundryError> {
    ToolRegistry::from_tools([Arc::new(get_sales_data()) as Arc<dyn Tool>])
}

/// All sample functions, registered in a fresh registry.
pub fn user_functions() -> Result<ToolRegistry, FoundryError> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(fetch_current_datetime()),
        Arc::new(fetch_weather()),
        Arc::new(send_email()),
        Arc::new(calculate_sum()),
        Arc::new(convert_temperature()),
        Arc::new(get_user_info()),
    ];
    ToolRegistry::from_tools(tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn call(name: &str, args: Value) -> Value {
        let registry = user_functions().unwrap();
        let out = registry.invoke(name, &args).await.unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[tokio::test]
    async fn sum_of_three_and_four() {
        assert_eq!(call("calculate_sum", json!({"a": 3, "b": 4})).await, json!({"result": 7}));
    }

    #[tokio::test]
    async fn weather_has_canned_cities() {
        assert_eq!(
            call("fetch_weather", json!({"location": "London"})).await,
            json!({"weather": "Cloudy, 18°C"})
        );
        assert_eq!(
            call("fetch_weather", json!({"location": "Paris"})).await,
            json!({"weather": "Weather data not available for this location."})
        );
    }

    #[tokio::test]
    async fn temperature_conversion() {
        assert_eq!(
            call("convert_temperature", json!({"celsius": 25})).await,
            json!({"fahrenheit": 77.0})
        );
    }

    #[tokio::test]
    async fn unknown_user_is_reported_in_payload() {
        assert_eq!(
            call("get_user_info", json!({"user_id": 9})).await,
            json!({"user_info": {"error": "User not found."}})
        );
        assert_eq!(
            call("get_user_info", json!({"user_id": 2})).await["user_info"]["name"],
            json!("Bob")
        );
    }

    #[tokio::test]
    async fn datetime_honors_format() {
        let out = call("fetch_current_datetime", json!({"format": "%Y"})).await;
        assert_eq!(out["current_time"].as_str().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn bad_datetime_format_is_a_tool_error() {
        let registry = user_functions().unwrap();
        let err = registry
            .invoke("fetch_current_datetime", &json!({"format": "%Q%"}))
            .await
            .unwrap_err();
        assert!(matches!(err, FoundryError::ToolExecution { .. }));
    }

    #[test]
    fn registers_six_functions_in_order() {
        let registry = user_functions().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "fetch_current_datetime",
                "fetch_weather",
                "send_email",
                "calculate_sum",
                "convert_temperature",
                "get_user_info",
            ]
        );
    }

    #[tokio::test]
    async fn sales_data_has_ten_consistent_records() {
        let registry = sales_functions().unwrap();
        let out = registry
            .invoke("get_sales_data", &json!({"year": 2024}))
            .await
            .unwrap();
        let records: Vec<Value> = serde_json::from_str(&out).unwrap();

        assert_eq!(records.len(), SALES_RECORDS);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["id"], json!(i + 1));
            assert_eq!(record["product"], json!(format!("Product {}", i + 1)));

            let quantity = record["quantity_sold"].as_u64().unwrap();
            let cost = record["cost_price"].as_f64().unwrap();
            let price = record["selling_price"].as_f64().unwrap();
            assert!((1..=100).contains(&quantity));
            assert!((5.0..=50.0).contains(&cost));
            assert!((10.0..=100.0).contains(&price));

            let expected = round_cents((price - cost) * quantity as f64);
            assert_eq!(record["profit"].as_f64().unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn sales_data_requires_a_year() {
        let err = sales_functions()
            .unwrap()
            .invoke("get_sales_data", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, FoundryError::InvalidArgument(_)));
    }
}
