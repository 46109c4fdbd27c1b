//! Weather Lookups
//!
//! Postal codes are resolved with Zippopotam.us and weather comes from
//! Open-Meteo. Both are reached through [`WeatherService`] so the weather
//! skills can be exercised without network access.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const ZIPPOPOTAM_URL: &str = "https://api.zippopotam.us";
const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const FORECAST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Parses the `temp_unit` setting. Anything other than Fahrenheit is Celsius.
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "f" | "fahrenheit" => Self::Fahrenheit,
            _ => Self::Celsius,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Fahrenheit => "Fahrenheit",
        }
    }

    fn query_value(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// A resolved postal code.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub weather_code: u32,
    pub high: f64,
    pub low: f64,
    pub precipitation_probability: f64,
}

/// Current conditions plus one entry per forecast day, starting today.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current_temperature: f64,
    pub days: Vec<DailyForecast>,
}

#[cfg_attr(test, mockall::automock)]
pub trait WeatherService: Send + Sync {
    fn locate(&self, postal_code: &str, country: &str) -> Result<Place>;

    /// Current temperature in degrees Celsius.
    fn current_temperature(&self, latitude: f64, longitude: f64) -> Result<f64>;

    fn forecast(&self, latitude: f64, longitude: f64, unit: TemperatureUnit) -> Result<Forecast>;
}

/// WMO weather interpretation codes, as documented by Open-Meteo.
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "A thunderstorm",
        96 => "A thunderstorm with slight hail",
        99 => "A thunderstorm with heavy hail",
        _ => "an unknown weather pattern",
    }
}

// --- Wire types ---

#[derive(Deserialize)]
struct ZipResponse {
    places: Vec<ZipPlace>,
}

#[derive(Deserialize)]
struct ZipPlace {
    latitude: String,
    longitude: String,
    #[serde(rename = "place name")]
    place_name: String,
    state: String,
}

#[derive(Deserialize)]
struct CurrentResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
    daily: DailyResponse,
}

#[derive(Deserialize)]
struct DailyResponse {
    weathercode: Vec<Option<u32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_probability_max: Vec<Option<f64>>,
}

impl ForecastResponse {
    fn into_forecast(self) -> Forecast {
        let daily = self.daily;
        let days = daily
            .weathercode
            .iter()
            .zip(&daily.temperature_2m_max)
            .zip(&daily.temperature_2m_min)
            .zip(&daily.precipitation_probability_max)
            .map(|(((code, high), low), precip)| DailyForecast {
                weather_code: code.unwrap_or(u32::MAX),
                high: high.unwrap_or_default(),
                low: low.unwrap_or_default(),
                precipitation_probability: precip.unwrap_or_default(),
            })
            .collect();
        Forecast {
            current_temperature: self.current_weather.temperature,
            days,
        }
    }
}

/// [`WeatherService`] backed by the public Zippopotam.us and Open-Meteo APIs.
pub struct OpenMeteoClient {
    http: reqwest::blocking::Client,
}

impl OpenMeteoClient {
    pub fn new() -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(FORECAST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }
}

impl WeatherService for OpenMeteoClient {
    fn locate(&self, postal_code: &str, country: &str) -> Result<Place> {
        let url = format!("{ZIPPOPOTAM_URL}/{}/{postal_code}", country.to_lowercase());
        let response = self.http.get(&url).timeout(LOOKUP_TIMEOUT).send()?;
        if !response.status().is_success() {
            return Err(anyhow!("ZIP lookup failed ({}).", response.status()));
        }
        let body: ZipResponse = response.json()?;
        let place = body
            .places
            .into_iter()
            .next()
            .context("ZIP lookup returned no places")?;
        Ok(Place {
            latitude: place.latitude.parse().context("Invalid latitude")?,
            longitude: place.longitude.parse().context("Invalid longitude")?,
            name: place.place_name,
            state: place.state,
        })
    }

    fn current_temperature(&self, latitude: f64, longitude: f64) -> Result<f64> {
        let body: CurrentResponse = self
            .http
            .get(OPEN_METEO_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .timeout(LOOKUP_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(body.current_weather.temperature)
    }

    fn forecast(&self, latitude: f64, longitude: f64, unit: TemperatureUnit) -> Result<Forecast> {
        info!(latitude, longitude, "Fetching forecast");
        let body: ForecastResponse = self
            .http
            .get(OPEN_METEO_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                (
                    "daily",
                    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max"
                        .to_string(),
                ),
                ("current_weather", "true".to_string()),
                ("temperature_unit", unit.query_value().to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(body.into_forecast())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_unit_from_setting() {
        assert_eq!(TemperatureUnit::from_setting("f"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_setting("Fahrenheit"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_setting("c"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_setting("kelvin"), TemperatureUnit::Celsius);
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(95), "A thunderstorm");
        assert_eq!(describe_weather_code(42), "an unknown weather pattern");
    }

    #[test]
    fn test_forecast_response_decoding() {
        let body = serde_json::json!({
            "current_weather": { "temperature": 71.6, "windspeed": 3.2 },
            "daily": {
                "time": ["2026-10-19", "2026-10-20"],
                "weathercode": [3, 61],
                "temperature_2m_max": [74.2, 65.0],
                "temperature_2m_min": [55.1, 50.4],
                "precipitation_probability_max": [5, null]
            }
        });
        let response: ForecastResponse = serde_json::from_value(body).unwrap();
        let forecast = response.into_forecast();

        assert_eq!(forecast.current_temperature, 71.6);
        assert_eq!(forecast.days.len(), 2);
        assert_eq!(forecast.days[1].weather_code, 61);
        assert_eq!(forecast.days[0].precipitation_probability, 5.0);
        assert_eq!(forecast.days[1].precipitation_probability, 0.0);
    }

    #[test]
    fn test_zip_response_decoding() {
        let body = serde_json::json!({
            "post code": "10001",
            "country": "United States",
            "places": [{
                "place name": "New York City",
                "longitude": "-73.9967",
                "state": "New York",
                "state abbreviation": "NY",
                "latitude": "40.7484"
            }]
        });
        let response: ZipResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.places[0].place_name, "New York City");
        assert_eq!(response.places[0].latitude, "40.7484");
    }
}
