mod apply;
mod artifact;
mod command;
mod fs_utils;
mod journal;
mod launch;
mod layout;
mod privilege;
mod probe;
mod registry;
mod tools;

pub use apply::{
    apply, apply_with_observer, ApplyReport, Host, ReconcileError, StepOutcome, StepReport,
};
pub use artifact::LauncherArtifact;
pub use command::{decode_console_output, describe_command, run_command_output, CommandOutput};
pub use journal::{
    current_unix_timestamp, read_action_journal, ActionJournal, ActionOutcome, ActionRecord,
};
pub use launch::{build_launch_command, launch_assistant};
pub use layout::{action_journal_path, default_state_dir, resolve_state_dir};
pub use privilege::{NetSessionPrivilege, PrivilegeCheck};
pub use probe::{probe_component, snapshot};
pub use registry::{
    expected_menu_entry, menu_key_path, parse_reg_query_value, MenuKeyEntry, RegExeRegistry,
    RegistryStore, CLASSES_ROOT,
};
pub use tools::{
    parse_distro_listing, DistroEntry, ExternalInstaller, InstallError, VersionQuery,
    WslToolchain,
};
