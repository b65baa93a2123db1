mod action;
mod component;
mod config;
mod launcher;
mod path;
mod planner;
mod snapshot;
mod version;

pub use action::{Action, Plan, TargetState};
pub use component::{Component, ComponentState, ExternalComponent, MenuKey};
pub use config::{Config, DEFAULT_LAUNCHER_DIR, DEFAULT_LAUNCHER_PATH};
pub use launcher::{menu_command, render_launcher_script, LAUNCHER_TEMPLATE_VERSION};
pub use path::{folder_title, translate_windows_path};
pub use planner::plan;
pub use snapshot::Snapshot;
pub use version::normalize_tool_version;
