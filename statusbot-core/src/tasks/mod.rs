pub mod status_refresh;
