use std::env;
use std::time::Duration;

use crate::features::locations::models::Coordinates;
use crate::features::map::models::Viewport;
use crate::shared::constants::{
    DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_GEOLOCATION_TIMEOUT_MS, DEFAULT_ZOOM, MAX_ZOOM,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub map: MapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Defaults applied to every mounted map surface
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub default_center: Coordinates,
    pub default_zoom: u8,
    pub geolocation_timeout: Duration,
    /// Seed the repository with the bundled Lusaka locations on startup
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            map: MapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024; // 1MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MapConfig {
    pub fn from_env() -> Result<Self, String> {
        let lat = env::var("MAP_DEFAULT_LAT")
            .unwrap_or_else(|_| DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_DEFAULT_LAT must be a valid number".to_string())?;

        let lng = env::var("MAP_DEFAULT_LNG")
            .unwrap_or_else(|_| DEFAULT_CENTER_LNG.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_DEFAULT_LNG must be a valid number".to_string())?;

        let default_center = Coordinates::new(lat, lng);
        if !default_center.is_valid() {
            return Err("MAP_DEFAULT_LAT/MAP_DEFAULT_LNG must be within [-90,90] and [-180,180]".to_string());
        }

        let default_zoom = env::var("MAP_DEFAULT_ZOOM")
            .unwrap_or_else(|_| DEFAULT_ZOOM.to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_DEFAULT_ZOOM must be a valid number".to_string())?;
        if default_zoom > MAX_ZOOM {
            return Err(format!("MAP_DEFAULT_ZOOM must not exceed {}", MAX_ZOOM));
        }

        let geolocation_timeout_ms = env::var("MAP_GEOLOCATION_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_GEOLOCATION_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "MAP_GEOLOCATION_TIMEOUT_MS must be a valid number".to_string())?;

        let seed_demo_data = env::var("MAP_SEED_DEMO_DATA")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "MAP_SEED_DEMO_DATA must be true or false".to_string())?;

        Ok(Self {
            default_center,
            default_zoom,
            geolocation_timeout: Duration::from_millis(geolocation_timeout_ms),
            seed_demo_data,
        })
    }

    pub fn default_viewport(&self) -> Viewport {
        Viewport::new(self.default_center, self.default_zoom)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            default_zoom: DEFAULT_ZOOM,
            geolocation_timeout: Duration::from_millis(DEFAULT_GEOLOCATION_TIMEOUT_MS),
            seed_demo_data: true,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "StreetMapper API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Map state API for StreetMapper".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
