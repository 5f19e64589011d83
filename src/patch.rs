//! Rewrites that make an ESP-IDF project build as C++ and teach the editor
//! about it.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::present::present;
use crate::progress::Reporter;
use crate::utils::{self, Error, Result};

pub const BUILD_ENTRY: &str = "CMakeLists.txt";
pub const EDITOR_SETTINGS: &str = ".vscode/settings.json";
pub const INTELLISENSE: &str = ".vscode/c_cpp_properties.json";

const MINIMUM_VERSION: &str = "cmake_minimum_required(VERSION 3.8)";
const CXX_STANDARD: &str = "set(CMAKE_CXX_STANDARD 17)";
const EXTRA_COMPONENT_DIRS: [&str; 2] = [
    "# only set if u dont use main but other dir hierarchy structure:",
    "set(EXTRA_COMPONENT_DIRS main)",
];

const COMPILE_COMMANDS: &str = "${workspaceFolder}/build/compile_commands.json";
const CONFIGURATION_PROVIDER: &str = "ms-vscode.makefile-tools";

const ASSOCIATIONS: &[&str] = &[
    "iostream",
    "array",
    "atomic",
    "strstream",
    "bit",
    "*.tcc",
    "bitset",
    "cctype",
    "chrono",
    "clocale",
    "cmath",
    "codecvt",
    "compare",
    "concepts",
    "condition_variable",
    "csignal",
    "cstdarg",
    "cstddef",
    "cstdint",
    "cstdio",
    "cstdlib",
    "cstring",
    "ctime",
    "cwchar",
    "cwctype",
    "deque",
    "list",
    "map",
    "set",
    "string",
    "unordered_map",
    "vector",
    "exception",
    "algorithm",
    "functional",
    "iterator",
    "memory",
    "memory_resource",
    "numeric",
    "random",
    "ratio",
    "regex",
    "string_view",
    "system_error",
    "tuple",
    "type_traits",
    "utility",
    "fstream",
    "future",
    "initializer_list",
    "iomanip",
    "iosfwd",
    "istream",
    "limits",
    "mutex",
    "new",
    "numbers",
    "ostream",
    "semaphore",
    "sstream",
    "stdexcept",
    "stop_token",
    "streambuf",
    "thread",
    "cinttypes",
    "typeinfo",
];

/// Pins the CMake version and adds the C++ settings to a top-level
/// `CMakeLists.txt`. Applying it to its own output changes nothing.
pub fn build_entry(text: &str) -> String {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let version =
        VERSION.get_or_init(|| Regex::new(r"^\s*cmake_minimum_required\s*\(").unwrap());

    let mut lines = text.split('\n').map(str::to_string).collect::<Vec<String>>();
    let Some(at) = lines.iter().position(|line| version.is_match(line)) else {
        tracing::warn!("no cmake_minimum_required line, leaving build entry unchanged");
        return text.to_string();
    };
    lines[at] = MINIMUM_VERSION.to_string();

    // The settings block is the run of non-blank lines right after the
    // version line.
    let block = lines[at + 1..]
        .iter()
        .take_while(|line| !line.trim().is_empty())
        .any(|line| line.contains("set(EXTRA_COMPONENT_DIRS"));
    if !block {
        for (offset, line) in EXTRA_COMPONENT_DIRS.iter().enumerate() {
            lines.insert(at + 1 + offset, line.to_string());
        }
    }
    if !lines.iter().any(|line| line.contains("set(CMAKE_CXX_STANDARD")) {
        lines.insert(at + 1, CXX_STANDARD.to_string());
    }

    lines.join("\n")
}

/// The complete `.vscode/settings.json` written by [`patch_editor_settings`].
pub fn file_associations() -> String {
    let associations = ASSOCIATIONS
        .iter()
        .map(|name| (name.to_string(), Value::from("cpp")))
        .collect::<Map<String, Value>>();
    let mut settings = Map::new();
    settings.insert(
        String::from("files.associations"),
        Value::Object(associations),
    );
    let mut text = serde_json::to_string_pretty(&Value::Object(settings))
        .expect("a map of strings always serializes");
    text.push('\n');
    text
}

/// Points the first IntelliSense configuration at the generated compile
/// command database.
pub fn intellisense(path: &Path, text: &str) -> Result<String> {
    let mut properties = serde_json::from_str::<Value>(text).map_err(|source| {
        Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let configuration = properties
        .get_mut("configurations")
        .and_then(Value::as_array_mut)
        .and_then(|configurations| configurations.first_mut())
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::MissingConfiguration {
            path: path.to_path_buf(),
        })?;
    configuration.insert(
        String::from("compileCommands"),
        Value::from(COMPILE_COMMANDS),
    );
    configuration.insert(
        String::from("configurationProvider"),
        Value::from(CONFIGURATION_PROVIDER),
    );
    serde_json::to_string_pretty(&properties).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn patch_build_entry(dir: &Path) -> Result<()> {
    let path = dir.join(BUILD_ENTRY);
    let text = utils::read_to_string(&path)?;
    utils::write_replace(&path, &build_entry(&text))
}

pub fn patch_editor_settings(dir: &Path) -> Result<()> {
    let path = dir.join(EDITOR_SETTINGS);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
    }
    utils::write_replace(&path, &file_associations())
}

pub fn patch_intellisense(dir: &Path) -> Result<()> {
    let path = dir.join(INTELLISENSE);
    let text = utils::read_to_string(&path)?;
    let patched = intellisense(&path, &text)?;
    utils::write_replace(&path, &patched)
}

/// Runs the three rewrites as separate reported steps. Under the continue
/// policy a failed rewrite does not stop the ones after it.
pub fn make_cxx_ready(dir: &Path, reporter: &Reporter) -> Result<Vec<PathBuf>> {
    let steps: [(&str, fn(&Path) -> Result<()>); 3] = [
        (BUILD_ENTRY, patch_build_entry),
        (EDITOR_SETTINGS, patch_editor_settings),
        (INTELLISENSE, patch_intellisense),
    ];
    let mut patched = Vec::new();
    for (file, step) in steps {
        let path = dir.join(file);
        let done = reporter.run(
            format!("Editing {}", present(&path)),
            || step(dir),
            Some(&format!("Done editing {file}")),
        )?;
        if done.is_some() {
            patched.push(path);
        }
    }
    Ok(patched)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::progress::Policy;

    const TEMPLATE_CMAKE: &str = "# The following lines of boilerplate have to be in your project's\n\
        # CMakeLists in this exact order for cmake to work correctly\n\
        cmake_minimum_required(VERSION 3.5)\n\
        \n\
        include($ENV{IDF_PATH}/tools/cmake/project.cmake)\n\
        project(blink)\n";

    #[test]
    fn build_entry_inserts_cxx_settings() {
        let patched = build_entry(TEMPLATE_CMAKE);
        let lines = patched.split('\n').collect::<Vec<_>>();
        assert_eq!(
            &lines[2..6],
            &[
                "cmake_minimum_required(VERSION 3.8)",
                "set(CMAKE_CXX_STANDARD 17)",
                "# only set if u dont use main but other dir hierarchy structure:",
                "set(EXTRA_COMPONENT_DIRS main)",
            ]
        );
        assert_eq!(lines[6], "");
        assert!(patched.ends_with("project(blink)\n"));
    }

    #[test]
    fn build_entry_is_idempotent() {
        let once = build_entry(TEMPLATE_CMAKE);
        let twice = build_entry(&once);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("set(EXTRA_COMPONENT_DIRS").count(), 1);
        assert_eq!(twice.matches("set(CMAKE_CXX_STANDARD").count(), 1);
    }

    #[test]
    fn build_entry_keeps_existing_settings() {
        let text = "cmake_minimum_required(VERSION 3.16)\n\
            set(EXTRA_COMPONENT_DIRS components)\n\
            \n\
            set(CMAKE_CXX_STANDARD 20)\n";
        let patched = build_entry(text);
        assert_eq!(
            patched,
            "cmake_minimum_required(VERSION 3.8)\n\
            set(EXTRA_COMPONENT_DIRS components)\n\
            \n\
            set(CMAKE_CXX_STANDARD 20)\n"
        );
    }

    #[test]
    fn build_entry_handles_version_on_last_line() {
        let patched = build_entry("cmake_minimum_required(VERSION 3.5)");
        assert_eq!(
            patched,
            "cmake_minimum_required(VERSION 3.8)\n\
            set(CMAKE_CXX_STANDARD 17)\n\
            # only set if u dont use main but other dir hierarchy structure:\n\
            set(EXTRA_COMPONENT_DIRS main)"
        );
    }

    #[test]
    fn build_entry_without_version_is_unchanged() {
        let text = "project(blink)\n";
        assert_eq!(build_entry(text), text);
    }

    #[test]
    fn file_associations_maps_headers_to_cpp() {
        let settings = serde_json::from_str::<Value>(&file_associations()).unwrap();
        let associations = settings["files.associations"].as_object().unwrap();
        assert_eq!(associations.len(), ASSOCIATIONS.len());
        assert_eq!(associations["iostream"], "cpp");
        assert_eq!(associations["*.tcc"], "cpp");
        assert_eq!(associations.keys().next().unwrap(), "iostream");
    }

    #[test]
    fn editor_settings_overwrite_prior_content() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".vscode")).unwrap();
        let path = tmp.path().join(EDITOR_SETTINGS);
        fs::write(&path, "{\"C_Cpp.intelliSenseEngine\": \"Tag Parser\"}").unwrap();

        patch_editor_settings(tmp.path()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), file_associations());
    }

    #[test]
    fn intellisense_sets_provider_and_keeps_order() {
        let text = r#"{
  "configurations": [
    {
      "name": "ESP-IDF",
      "compilerPath": "/opt/xtensa-esp32-elf-gcc"
    }
  ],
  "version": 4
}"#;
        let patched = intellisense(Path::new(INTELLISENSE), text).unwrap();
        assert_eq!(
            patched,
            r#"{
  "configurations": [
    {
      "name": "ESP-IDF",
      "compilerPath": "/opt/xtensa-esp32-elf-gcc",
      "compileCommands": "${workspaceFolder}/build/compile_commands.json",
      "configurationProvider": "ms-vscode.makefile-tools"
    }
  ],
  "version": 4
}"#
        );
    }

    #[test]
    fn intellisense_rejects_malformed_file_and_leaves_it() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(".vscode")).unwrap();
        let path = tmp.path().join(INTELLISENSE);
        fs::write(&path, "{ \"configurations\": [ ").unwrap();

        let err = patch_intellisense(tmp.path()).unwrap_err();

        assert!(matches!(err, Error::ConfigParse { .. }));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{ \"configurations\": [ "
        );
    }

    #[test]
    fn intellisense_requires_first_configuration() {
        let err = intellisense(Path::new(INTELLISENSE), r#"{"configurations": []}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration { .. }));
    }

    #[test]
    fn make_cxx_ready_continues_past_failed_step() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::create_dir(dir.join(".vscode")).unwrap();
        fs::write(dir.join(INTELLISENSE), r#"{"configurations": [{}]}"#).unwrap();

        let patched = make_cxx_ready(dir, &Reporter::hidden(Policy::Continue)).unwrap();

        assert_eq!(
            patched,
            vec![dir.join(EDITOR_SETTINGS), dir.join(INTELLISENSE)]
        );
        assert!(!dir.join(BUILD_ENTRY).exists());
    }

    #[test]
    fn make_cxx_ready_stops_at_failed_step_under_abort() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::create_dir(dir.join(".vscode")).unwrap();

        let err = make_cxx_ready(dir, &Reporter::hidden(Policy::Abort)).unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
        assert!(!dir.join(EDITOR_SETTINGS).exists());
    }
}
