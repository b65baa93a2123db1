use std::fmt;

/// A tracked piece of machine state, in snapshot and render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Runtime,
    Subsystem,
    Distro,
    JsRuntime,
    Assistant,
    LauncherArtifact,
    BackgroundMenuKey,
    FolderMenuKey,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Self::Runtime,
        Self::Subsystem,
        Self::Distro,
        Self::JsRuntime,
        Self::Assistant,
        Self::LauncherArtifact,
        Self::BackgroundMenuKey,
        Self::FolderMenuKey,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Subsystem => "subsystem",
            Self::Distro => "distro",
            Self::JsRuntime => "js-runtime",
            Self::Assistant => "assistant",
            Self::LauncherArtifact => "launcher-artifact",
            Self::BackgroundMenuKey => "background-menu-key",
            Self::FolderMenuKey => "folder-menu-key",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Runtime => "Command Runtime",
            Self::Subsystem => "WSL",
            Self::Distro => "Linux Distribution",
            Self::JsRuntime => "Node.js",
            Self::Assistant => "Claude Code",
            Self::LauncherArtifact => "Launcher Script",
            Self::BackgroundMenuKey => "Background Menu Key",
            Self::FolderMenuKey => "Folder Menu Key",
        }
    }

    pub fn as_external(self) -> Option<ExternalComponent> {
        match self {
            Self::Subsystem => Some(ExternalComponent::Subsystem),
            Self::Distro => Some(ExternalComponent::Distro),
            Self::JsRuntime => Some(ExternalComponent::JsRuntime),
            Self::Assistant => Some(ExternalComponent::Assistant),
            _ => None,
        }
    }

    pub fn as_menu_key(self) -> Option<MenuKey> {
        match self {
            Self::BackgroundMenuKey => Some(MenuKey::Background),
            Self::FolderMenuKey => Some(MenuKey::Folder),
            _ => None,
        }
    }

    pub fn is_context_menu_part(self) -> bool {
        matches!(
            self,
            Self::LauncherArtifact | Self::BackgroundMenuKey | Self::FolderMenuKey
        )
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Components that an external installer can bring onto the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExternalComponent {
    Subsystem,
    Distro,
    JsRuntime,
    Assistant,
}

impl ExternalComponent {
    /// Each entry depends on the one before it.
    pub const INSTALL_ORDER: [ExternalComponent; 4] = [
        Self::Subsystem,
        Self::Distro,
        Self::JsRuntime,
        Self::Assistant,
    ];

    pub fn component(self) -> Component {
        match self {
            Self::Subsystem => Component::Subsystem,
            Self::Distro => Component::Distro,
            Self::JsRuntime => Component::JsRuntime,
            Self::Assistant => Component::Assistant,
        }
    }

    pub fn prerequisite(self) -> Option<ExternalComponent> {
        match self {
            Self::Subsystem => None,
            Self::Distro => Some(Self::Subsystem),
            Self::JsRuntime => Some(Self::Distro),
            Self::Assistant => Some(Self::JsRuntime),
        }
    }

    pub fn as_str(self) -> &'static str {
        self.component().as_str()
    }
}

impl fmt::Display for ExternalComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component().display_name())
    }
}

/// The two Explorer right-click surfaces that carry the menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MenuKey {
    Background,
    Folder,
}

impl MenuKey {
    pub const ALL: [MenuKey; 2] = [Self::Background, Self::Folder];

    pub fn component(self) -> Component {
        match self {
            Self::Background => Component::BackgroundMenuKey,
            Self::Folder => Component::FolderMenuKey,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Folder => "folder",
        }
    }

    /// Shell key parent relative to the classes root.
    pub fn shell_root(self) -> &'static str {
        match self {
            Self::Background => r"Directory\Background\shell",
            Self::Folder => r"Directory\shell",
        }
    }

    /// Explorer substitutes the clicked directory for this token.
    pub fn path_placeholder(self) -> &'static str {
        match self {
            Self::Background => "%V",
            Self::Folder => "%1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentState {
    Absent,
    PartiallyInstalled,
    Installed(Option<String>),
    Stale,
}

impl ComponentState {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Installed(version) => version.as_deref(),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Absent => "Absent".to_string(),
            Self::PartiallyInstalled => "Partially installed".to_string(),
            Self::Installed(None) => "Installed".to_string(),
            Self::Installed(Some(version)) => format!("Installed ({version})"),
            Self::Stale => "Stale".to_string(),
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
