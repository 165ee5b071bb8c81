pub mod ingestion_request;
pub mod secret;
pub mod weather_record;
