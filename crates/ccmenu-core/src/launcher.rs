use crate::{Config, MenuKey};

/// Bumped whenever the rendered script changes shape, so old copies probe as stale.
pub const LAUNCHER_TEMPLATE_VERSION: u32 = 2;

/// Registry command for `key`: one quoted launcher invocation, clicked directory as the only argument.
pub fn menu_command(config: &Config, key: MenuKey) -> String {
    format!(
        "\"{}\" \"{}\"",
        config.launcher_path.display(),
        key.path_placeholder()
    )
}

/// Windows Terminal returns once the tab is open, so only the `start /wait`
/// fallback hands the assistant's exit code back to Explorer. `wt` also
/// splits its command line at `;`, which the script escapes as `\;` in the
/// title and path it passes on.
pub fn render_launcher_script(config: &Config) -> String {
    let distro = &config.distro;
    let assistant = &config.assistant_command;
    let lines = [
        "@echo off".to_string(),
        "setlocal EnableExtensions".to_string(),
        format!("rem ccmenu launcher template v{LAUNCHER_TEMPLATE_VERSION}"),
        String::new(),
        r#"set "WINPATH=%~1""#.to_string(),
        r#"if "%WINPATH%"=="" ("#.to_string(),
        "    echo ccmenu: no directory argument was given 1>&2".to_string(),
        "    exit /b 2".to_string(),
        ")".to_string(),
        String::new(),
        r#"if "%WINPATH:~-1%"=="\" if not "%WINPATH:~1%"==":\" set "WINPATH=%WINPATH:~0,-1%""#
            .to_string(),
        r#"set "DRIVE=%WINPATH:~0,1%""#.to_string(),
        r#"for %%L in (a b c d e f g h i j k l m n o p q r s t u v w x y z) do if /I "%DRIVE%"=="%%L" set "DRIVE=%%L""#
            .to_string(),
        r#"set "REST=%WINPATH:~2%""#.to_string(),
        r#"if defined REST set "REST=%REST:\=/%""#.to_string(),
        r#"if "%REST%"=="/" set "REST=""#.to_string(),
        r#"set "LINUXPATH=/mnt/%DRIVE%%REST%""#.to_string(),
        String::new(),
        r#"for %%F in ("%WINPATH%") do set "TITLE=%%~nxF""#.to_string(),
        r#"if "%TITLE%"=="" set "TITLE=Root""#.to_string(),
        String::new(),
        "where wt >nul 2>nul".to_string(),
        "if not errorlevel 1 (".to_string(),
        r#"    set "WTTITLE=%TITLE:;=\;%""#.to_string(),
        r#"    set "WTPATH=%LINUXPATH:;=\;%""#.to_string(),
        format!(
            r#"    wt new-tab --title "{assistant} - %WTTITLE%" wsl -d {distro} --cd "%WTPATH%" bash -lic "{assistant}""#
        ),
        "    exit /b %ERRORLEVEL%".to_string(),
        ")".to_string(),
        String::new(),
        format!(
            r#"start "{assistant} - %TITLE%" /wait wsl -d {distro} --cd "%LINUXPATH%" bash -lic "{assistant}""#
        ),
        "exit /b %ERRORLEVEL%".to_string(),
    ];

    let mut script = lines.join("\r\n");
    script.push_str("\r\n");
    script
}
