use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::utils::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Source,
    HeaderOnly,
}

/// Creates `components/<name>` below `project` with an
/// `idf_component_register` build file and a header, plus a source file for
/// [`Kind::Source`]. An existing component is never touched.
pub fn scaffold(project: &Path, name: &str, kind: Kind) -> Result<PathBuf> {
    let dir = project.join("components").join(name);
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent).map_err(create(parent))?;
    }
    fs::create_dir(&dir).map_err(create(&dir))?;
    let include = dir.join("include");
    fs::create_dir(&include).map_err(create(&include))?;

    let namespace = identifier(name);
    write(
        include.join(format!("{name}.hpp")),
        format!("#pragma once\n\nnamespace {namespace} {{\n\n}} // namespace {namespace}\n"),
    )?;
    let register = match kind {
        Kind::Source => {
            write(
                dir.join(format!("{name}.cpp")),
                format!(
                    "#include \"{name}.hpp\"\n\nnamespace {namespace} {{\n\n}} // namespace {namespace}\n"
                ),
            )?;
            format!("idf_component_register(SRCS \"{name}.cpp\"\n                       INCLUDE_DIRS \"include\")\n")
        }
        Kind::HeaderOnly => String::from("idf_component_register(INCLUDE_DIRS \"include\")\n"),
    };
    write(dir.join("CMakeLists.txt"), register)?;
    Ok(dir)
}

/// A C++ identifier for `name`: non-alphanumerics become `_`, and a leading
/// digit gets a `_` in front.
fn identifier(name: &str) -> String {
    let ident = name.replace(|c: char| !c.is_ascii_alphanumeric(), "_");
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{ident}")
    } else {
        ident
    }
}

fn create(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::Create {
        path: path.to_path_buf(),
        source,
    }
}

fn write(path: PathBuf, contents: String) -> Result<()> {
    fs::write(&path, contents).map_err(|source| Error::Write { path, source })
}
