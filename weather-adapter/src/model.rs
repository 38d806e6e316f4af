use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UpstreamCause;

/// City used when a request names none.
pub const DEFAULT_CITY: &str = "Pune";

/// Provider status value that marks a successful reply.
pub const SUCCESS_SENTINEL: f64 = 200.0;

/// Inbound lookup parameters, built per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub city: Option<String>,
}

impl Query {
    pub fn new(city: Option<&str>) -> Self {
        Self { city: city.map(str::to_owned) }
    }

    /// The city to send upstream; absent or empty falls back to [`DEFAULT_CITY`].
    pub fn resolved_city(&self) -> &str {
        match self.city.as_deref() {
            Some(city) if !city.is_empty() => city,
            _ => DEFAULT_CITY,
        }
    }
}

/// Stable output shape of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWeather {
    pub city: String,
    pub temperature: i64,
    pub weather: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Raw current-weather reply, kept untyped until the sentinel says success.
///
/// Failure bodies such as `{"cod":"404","message":"city not found"}` or a
/// reply with odd field types must still be judged on `cod` alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProviderResponse {
    raw: Value,
}

/// Fields read from a successful reply. All optional so a gap is reported
/// by name rather than as a decode error.
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: Option<String>,
    main: Option<CurrentMain>,
    weather: Option<Vec<CurrentCondition>>,
    wind: Option<CurrentWind>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentWind {
    speed: Option<f64>,
}

impl ProviderResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Embedded status sentinel, if the body is an object carrying one.
    pub fn cod(&self) -> Option<&Value> {
        self.raw.get("cod")
    }

    /// True only for a numeric `cod` equal to 200; `"200"` as a string does not count.
    pub fn is_success(&self) -> bool {
        self.cod().and_then(Value::as_f64) == Some(SUCCESS_SENTINEL)
    }

    /// Reshape a successful reply into [`NormalizedWeather`].
    pub fn normalize(self) -> Result<NormalizedWeather, UpstreamCause> {
        let reply: CurrentWeather = serde_json::from_value(self.raw)?;

        let city = reply.name.ok_or(UpstreamCause::MissingField("name"))?;
        let main = reply.main.ok_or(UpstreamCause::MissingField("main"))?;
        let temp = main.temp.ok_or(UpstreamCause::MissingField("main.temp"))?;
        let humidity = main
            .humidity
            .ok_or(UpstreamCause::MissingField("main.humidity"))?;
        let humidity = u8::try_from(round_half_up(humidity))
            .map_err(|_| UpstreamCause::OutOfRange("main.humidity"))?;

        let weather = reply
            .weather
            .and_then(|conditions| conditions.into_iter().next())
            .and_then(|condition| condition.description)
            .ok_or(UpstreamCause::MissingField("weather[0].description"))?;

        let wind_speed = reply.wind.and_then(|wind| wind.speed).unwrap_or(0.0);

        Ok(NormalizedWeather {
            city,
            temperature: round_half_up(temp),
            weather,
            humidity,
            wind_speed,
        })
    }
}

/// Nearest integer with halves rounded toward positive infinity (2.5 -> 3, -2.5 -> -2).
fn round_half_up(value: f64) -> i64 {
    // `(value + 0.5).floor()` rounds twice and turns 0.49999999999999994 into 1.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}
