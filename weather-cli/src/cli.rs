use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_adapter::{
    AdapterError, Config, NormalizedWeather, ProviderId, ResponseEnvelope, WeatherAdapter,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name.
        #[arg(default_value = "openweather")]
        provider: String,
    },

    /// Show current weather for a city.
    Show {
        /// City name; defaults to Pune.
        city: Option<String>,

        /// Print the full response envelope as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, json } => show(city.as_deref(), json).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;
    if config.is_provider_configured(id) {
        println!("An API key for {id} is already stored; entering a new one replaces it.");
    }

    let api_key = Password::new(&format!("{id} API key:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    let path = config.save()?;
    println!("Saved {id} API key to {}", path.display());

    Ok(())
}

async fn show(city: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?.adapter_config(ProviderId::OpenWeather, |name| {
        std::env::var(name).ok()
    });
    let adapter = WeatherAdapter::from_config(&config);
    let result = adapter.lookup(city).await;

    if json {
        let envelope = ResponseEnvelope::from_result(&result);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    match result {
        Ok(weather) => {
            println!("{}", render_summary(&weather));
            Ok(())
        }
        Err(err) => bail!(describe_error(&err)),
    }
}

fn render_summary(weather: &NormalizedWeather) -> String {
    format!(
        "{}: {}°C, {}\nHumidity: {}%  Wind: {} m/s",
        weather.city, weather.temperature, weather.weather, weather.humidity, weather.wind_speed
    )
}

fn describe_error(err: &AdapterError) -> String {
    let mut message = format!("{err} (status {})", err.status_code());
    if matches!(err, AdapterError::Configuration) {
        message.push_str(
            "\nHint: run `weather configure` or set WEATHER_API_KEY in the environment.",
        );
    } else if err.is_retryable() {
        message.push_str(
            "\nHint: the weather provider may be temporarily unavailable; try again.",
        );
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_adapter::UpstreamCause;

    #[test]
    fn parses_show_with_city_and_json_flag() {
        let cli = Cli::try_parse_from(["weather", "show", "London", "--json"]).unwrap();
        match cli.command {
            Command::Show { city, json } => {
                assert_eq!(city.as_deref(), Some("London"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_city_is_optional() {
        let cli = Cli::try_parse_from(["weather", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show {
                city: None,
                json: false
            }
        ));
    }

    #[test]
    fn configure_defaults_to_openweather() {
        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        match cli.command {
            Command::Configure { provider } => assert_eq!(provider, "openweather"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn summary_is_human_readable() {
        let weather = NormalizedWeather {
            city: "London".into(),
            temperature: 16,
            weather: "clear sky".into(),
            humidity: 70,
            wind_speed: 3.1,
        };

        assert_eq!(
            render_summary(&weather),
            "London: 16°C, clear sky\nHumidity: 70%  Wind: 3.1 m/s"
        );
    }

    #[test]
    fn configuration_error_carries_hint() {
        let message = describe_error(&AdapterError::Configuration);
        assert!(message.starts_with("Weather API key not configured (status 500)"));
        assert!(message.contains("weather configure"));

        assert_eq!(
            describe_error(&AdapterError::NotFound),
            "City not found (status 404)"
        );
    }

    #[test]
    fn upstream_error_suggests_retry() {
        let err = AdapterError::Upstream(UpstreamCause::MissingField("main"));
        let message = describe_error(&err);

        assert!(message.starts_with("Failed to fetch weather data (status 500)"));
        assert!(message.contains("try again"));
    }
}
