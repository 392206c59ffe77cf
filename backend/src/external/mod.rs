//! External API integrations

pub mod mailer;
pub mod weather;

pub use mailer::{Mailer, SmtpMailer};
pub use weather::{ForecastProvider, WeatherClient};
