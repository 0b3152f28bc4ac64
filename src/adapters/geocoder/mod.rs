//! Geocoder adapters.

mod static_geocoder;
mod yandex;

pub use static_geocoder::StaticGeocoder;
pub use yandex::{YandexConfig, YandexGeocoder};
