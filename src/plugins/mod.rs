pub mod nuget_plugin;

pub use nuget_plugin::NugetPushCommand;
