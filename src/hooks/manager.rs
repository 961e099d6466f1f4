// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Hook manager for installing and managing git hooks.

use crate::error::{CplError, HookError, Result};
use crate::git;
use std::fs;
use std::path::{Path, PathBuf};

use super::templates::{HookTemplate, HOOK_MARKER};

/// Manager for git hooks.
pub struct HookManager {
    hooks_dir: PathBuf,
}

impl HookManager {
    /// Create a new hook manager for the current repository.
    pub fn new() -> Result<Self> {
        let repo = git::open_repo()?;
        Self::with_hooks_dir(repo.git_dir().join("hooks"))
    }

    /// Create a hook manager for an explicit hooks directory.
    pub fn with_hooks_dir(hooks_dir: PathBuf) -> Result<Self> {
        if !hooks_dir.exists() {
            fs::create_dir_all(&hooks_dir).map_err(|e| {
                CplError::Hook(HookError::InstallFailed {
                    hook: "all".to_string(),
                    message: format!("Failed to create hooks directory: {}", e),
                })
            })?;
        }

        Ok(Self { hooks_dir })
    }

    /// Install a specific hook.
    pub fn install_hook(&self, hook_name: &str, force: bool) -> Result<()> {
        let template = parse_hook(hook_name)?;
        self.install_template(&template, force)
    }

    /// Install all hooks.
    pub fn install_all(&self, force: bool) -> Result<()> {
        for template in HookTemplate::all() {
            self.install_template(template, force)?;
        }
        Ok(())
    }

    /// Install a hook from a template.
    ///
    /// A foreign hook is only replaced with `force`, and is then kept as
    /// `<hook>.backup` so uninstalling restores it.
    fn install_template(&self, template: &HookTemplate, force: bool) -> Result<()> {
        let hook_path = self.hooks_dir.join(template.filename());
        let backup_path = self.backup_path(template);
        let install_error = |message: String| {
            CplError::Hook(HookError::InstallFailed {
                hook: template.filename().to_string(),
                message,
            })
        };

        if hook_path.exists() && !self.is_cpl_hook(&hook_path)? {
            if !force {
                return Err(CplError::Hook(HookError::AlreadyExists {
                    hook: template.filename().to_string(),
                }));
            }

            if backup_path.exists() {
                return Err(install_error(format!(
                    "Backup {} already exists; remove it before forcing a reinstall",
                    backup_path.display()
                )));
            }

            fs::rename(&hook_path, &backup_path)
                .map_err(|e| install_error(format!("Failed to backup existing hook: {}", e)))?;
            tracing::debug!("Backed up existing hook to {:?}", backup_path);
        }

        fs::write(&hook_path, template.generate())
            .map_err(|e| install_error(format!("Failed to write hook: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&hook_path)
                .map_err(|e| install_error(format!("Failed to get permissions: {}", e)))?
                .permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&hook_path, perms)
                .map_err(|e| install_error(format!("Failed to set permissions: {}", e)))?;
        }

        tracing::debug!("Installed hook at {:?}", hook_path);

        Ok(())
    }

    /// Uninstall a specific hook.
    pub fn uninstall_hook(&self, hook_name: &str) -> Result<()> {
        let template = parse_hook(hook_name)?;
        let hook_path = self.hooks_dir.join(template.filename());
        let backup_path = self.backup_path(&template);

        if !hook_path.exists() {
            return Ok(());
        }

        if !self.is_cpl_hook(&hook_path)? {
            return Err(CplError::Hook(HookError::RemoveFailed {
                hook: hook_name.to_string(),
                message: "Hook was not installed by cpl".to_string(),
            }));
        }

        fs::remove_file(&hook_path).map_err(|e| {
            CplError::Hook(HookError::RemoveFailed {
                hook: hook_name.to_string(),
                message: format!("Failed to remove hook: {}", e),
            })
        })?;

        if backup_path.exists() {
            fs::rename(&backup_path, &hook_path).map_err(|e| {
                CplError::Hook(HookError::RemoveFailed {
                    hook: hook_name.to_string(),
                    message: format!("Failed to restore backup: {}", e),
                })
            })?;
        }

        Ok(())
    }

    /// Uninstall all hooks.
    pub fn uninstall_all(&self) -> Result<()> {
        for template in HookTemplate::all() {
            self.uninstall_hook(template.filename())?;
        }
        Ok(())
    }

    /// Get the status of all hooks.
    pub fn status(&self) -> Result<Vec<(String, bool)>> {
        let mut status = Vec::new();

        for template in HookTemplate::all() {
            let hook_path = self.hooks_dir.join(template.filename());
            let installed = hook_path.exists() && self.is_cpl_hook(&hook_path)?;
            status.push((template.filename().to_string(), installed));
        }

        Ok(status)
    }

    fn backup_path(&self, template: &HookTemplate) -> PathBuf {
        self.hooks_dir
            .join(format!("{}.backup", template.filename()))
    }

    /// Check if a hook was installed by cpl.
    fn is_cpl_hook(&self, path: &Path) -> Result<bool> {
        let content = fs::read_to_string(path).map_err(|e| {
            CplError::Hook(HookError::InstallFailed {
                hook: path.display().to_string(),
                message: format!("Failed to read hook: {}", e),
            })
        })?;

        Ok(content.contains(HOOK_MARKER))
    }
}

fn parse_hook(hook_name: &str) -> Result<HookTemplate> {
    hook_name.parse::<HookTemplate>().map_err(|_| {
        CplError::Hook(HookError::NotFound {
            hook: hook_name.to_string(),
        })
    })
}
