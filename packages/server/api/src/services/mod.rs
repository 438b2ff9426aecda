pub mod settings_resolver;
