pub mod config;
pub mod i18n;
pub mod pages;
pub mod preferences;
pub mod routing;
pub mod server;
pub mod site;
pub mod sitemap;
