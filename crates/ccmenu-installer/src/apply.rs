use std::collections::HashSet;

use ccmenu_core::{Action, Component, ComponentState, Config, ExternalComponent, Plan, TargetState};
use thiserror::Error;

use crate::artifact::LauncherArtifact;
use crate::journal::{ActionJournal, ActionOutcome};
use crate::privilege::PrivilegeCheck;
use crate::probe::probe_component;
use crate::registry::{expected_menu_entry, RegistryStore};
use crate::tools::{ExternalInstaller, InstallError, VersionQuery};

/// Everything the reconciler may read or mutate on the machine.
pub struct Host<'a> {
    pub config: &'a Config,
    pub registry: &'a dyn RegistryStore,
    pub tools: &'a dyn VersionQuery,
    pub installer: &'a dyn ExternalInstaller,
    pub privilege: &'a dyn PrivilegeCheck,
    launcher: LauncherArtifact,
}

impl<'a> Host<'a> {
    pub fn new(
        config: &'a Config,
        registry: &'a dyn RegistryStore,
        tools: &'a dyn VersionQuery,
        installer: &'a dyn ExternalInstaller,
        privilege: &'a dyn PrivilegeCheck,
    ) -> Self {
        Self {
            config,
            registry,
            tools,
            installer,
            privilege,
            launcher: LauncherArtifact::from_config(config),
        }
    }

    pub fn with_launcher(mut self, launcher: LauncherArtifact) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn launcher(&self) -> &LauncherArtifact {
        &self.launcher
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("administrator privileges are required for {target}; run ccmenu as Administrator and retry")]
    PermissionDenied { target: TargetState },
    #[error("{component} could not be installed: {detail}; {}", external_remediation(.component))]
    ExternalToolMissingOrFailed {
        component: ExternalComponent,
        detail: String,
    },
    #[error("step {step} ({action}) did not take effect: expected {component} to be {expected}, found {found}{}", detail_suffix(.detail))]
    VerificationFailed {
        step: usize,
        action: Action,
        component: Component,
        expected: String,
        found: String,
        detail: Option<String>,
    },
}

impl ReconcileError {
    pub fn component(&self) -> Option<Component> {
        match self {
            Self::PermissionDenied { .. } => None,
            Self::ExternalToolMissingOrFailed { component, .. } => Some(component.component()),
            Self::VerificationFailed { component, .. } => Some(*component),
        }
    }
}

fn external_remediation(component: &ExternalComponent) -> String {
    match component {
        ExternalComponent::Subsystem => {
            "install WSL manually (a restart may be required), then re-run ccmenu".to_string()
        }
        other => format!("re-run after installing {other}"),
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|detail| format!(" ({detail})"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied { state: ComponentState },
    Failed(ReconcileError),
    Skipped { reason: String },
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub action: Action,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub target: TargetState,
    pub steps: Vec<StepReport>,
    pub warnings: Vec<String>,
}

impl ApplyReport {
    pub fn errors(&self) -> Vec<&ReconcileError> {
        self.steps
            .iter()
            .filter_map(|step| match &step.outcome {
                StepOutcome::Failed(err) => Some(err),
                _ => None,
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.steps
            .iter()
            .all(|step| matches!(step.outcome, StepOutcome::Applied { .. }))
    }

    pub fn aborted(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.outcome, StepOutcome::NotAttempted))
    }
}

pub fn apply(
    plan: &Plan,
    host: &Host<'_>,
    journal: &mut ActionJournal,
) -> Result<ApplyReport, ReconcileError> {
    apply_with_observer(plan, host, journal, |_| {})
}

/// Runs the plan in order, re-probing after each step. No rollback: completed steps stay.
pub fn apply_with_observer<Observe>(
    plan: &Plan,
    host: &Host<'_>,
    journal: &mut ActionJournal,
    mut observe: Observe,
) -> Result<ApplyReport, ReconcileError>
where
    Observe: FnMut(&StepReport),
{
    let mut report = ApplyReport {
        target: plan.target(),
        steps: Vec::with_capacity(plan.len()),
        warnings: Vec::new(),
    };
    if plan.is_empty() {
        return Ok(report);
    }
    if plan.requires_elevation() && !host.privilege.is_elevated() {
        return Err(ReconcileError::PermissionDenied {
            target: plan.target(),
        });
    }

    let mut failed_externals = HashSet::new();
    let mut aborted = false;

    for (index, action) in plan.actions().iter().copied().enumerate() {
        let step_number = index + 1;
        if aborted {
            let step = StepReport {
                index,
                action,
                outcome: StepOutcome::NotAttempted,
            };
            observe(&step);
            report.steps.push(step);
            continue;
        }

        if let Action::InvokeExternalInstaller(component) = action {
            if let Some(blocker) = component
                .prerequisite()
                .filter(|prerequisite| failed_externals.contains(prerequisite))
            {
                failed_externals.insert(component);
                let reason = format!("skipped because {blocker} is not installed");
                report
                    .warnings
                    .push(format!("step {step_number} ({action}) {reason}"));
                record(journal, &mut report, action, ActionOutcome::Skipped, Some(reason.clone()));
                let step = StepReport {
                    index,
                    action,
                    outcome: StepOutcome::Skipped { reason },
                };
                observe(&step);
                report.steps.push(step);
                continue;
            }
        }

        let execution = execute_action(host, action);
        if let Err(ActionError::Install(err)) = &execution {
            if let Action::InvokeExternalInstaller(component) = action {
                failed_externals.insert(component);
            }
            record(journal, &mut report, action, ActionOutcome::Failed, Some(err.to_string()));
            let step = StepReport {
                index,
                action,
                outcome: StepOutcome::Failed(ReconcileError::ExternalToolMissingOrFailed {
                    component: err.component(),
                    detail: err.to_string(),
                }),
            };
            observe(&step);
            report.steps.push(step);
            continue;
        }
        let (installed_version, execution_detail) = match execution {
            Ok(version) => (version, None),
            Err(ActionError::Host(err)) => (None, Some(format!("{err:#}"))),
            Err(ActionError::Install(_)) => (None, None),
        };

        let component = action.component();
        let state = probe_component(host, component);
        let verified = if action.removes() {
            state.is_absent()
        } else {
            state.is_installed()
        };

        let step = if verified {
            let detail = match action {
                Action::WriteLauncherArtifact => launcher_digest_detail(host),
                Action::InvokeExternalInstaller(_) => installed_version
                    .or_else(|| state.version().map(str::to_string))
                    .map(|version| format!("version={version}")),
                _ => execution_detail,
            };
            record(journal, &mut report, action, ActionOutcome::Ok, detail);
            StepReport {
                index,
                action,
                outcome: StepOutcome::Applied { state },
            }
        } else {
            aborted = true;
            if let Action::InvokeExternalInstaller(component) = action {
                failed_externals.insert(component);
            }
            let execution_detail = execution_detail.or_else(|| restart_hint(action));
            record(
                journal,
                &mut report,
                action,
                ActionOutcome::VerificationFailed,
                Some(format!("found {state}{}", detail_suffix(&execution_detail))),
            );
            StepReport {
                index,
                action,
                outcome: StepOutcome::Failed(ReconcileError::VerificationFailed {
                    step: step_number,
                    action,
                    component,
                    expected: if action.removes() {
                        ComponentState::Absent.label()
                    } else {
                        "Installed".to_string()
                    },
                    found: state.label(),
                    detail: execution_detail,
                }),
            }
        };
        observe(&step);
        report.steps.push(step);
    }

    Ok(report)
}

fn launcher_digest_detail(host: &Host<'_>) -> Option<String> {
    match host.launcher().content_digest() {
        Ok(digest) => digest.map(|digest| format!("sha256={digest}")),
        Err(err) => Some(format!("{err:#}")),
    }
}

fn restart_hint(action: Action) -> Option<String> {
    (action == Action::InvokeExternalInstaller(ExternalComponent::Subsystem))
        .then(|| "a restart may be required before WSL is usable".to_string())
}

enum ActionError {
    Install(InstallError),
    Host(anyhow::Error),
}

/// Yields the version an external installer reported, if any.
fn execute_action(host: &Host<'_>, action: Action) -> Result<Option<String>, ActionError> {
    let done = match action {
        Action::CreateRegistryKey(key) => host
            .registry
            .write_menu_key(key, &expected_menu_entry(host.config, key)),
        Action::DeleteRegistryKey(key) => host.registry.delete_menu_key(key),
        Action::WriteLauncherArtifact => host.launcher().write(),
        Action::DeleteLauncherArtifact => host.launcher().remove(),
        Action::InvokeExternalInstaller(component) => {
            return host
                .installer
                .install(component)
                .map_err(ActionError::Install)
        }
    };
    done.map(|()| None).map_err(ActionError::Host)
}

// A broken trail must not stop the plan; it is surfaced as a warning instead.
fn record(
    journal: &mut ActionJournal,
    report: &mut ApplyReport,
    action: Action,
    outcome: ActionOutcome,
    detail: Option<String>,
) {
    if let Err(err) = journal.record(action, outcome, detail) {
        report
            .warnings
            .push(format!("action journal warning: {err:#}"));
    }
}
