//! Tera scaffolding engine — [`PackageKind`], [`PackageContext`] and
//! [`Scaffold`].
//!
//! # Generated tree
//!
//! | Kind       | Files                                                        |
//! |------------|--------------------------------------------------------------|
//! | library    | `package.xml`, `CMakeLists.txt`, `README.md`, `src/.gitignore`, `include/<name>/.gitignore`, `test/test_<name>.cpp` |
//! | executable | `package.xml`, `CMakeLists.txt`, `README.md`, `src/.gitignore`, `test/test_<name>.cpp` |

use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::Tera;

use crate::error::{io_err, ScaffoldError};

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("package.xml.tera", include_str!("templates/package.xml.tera")),
    ("cmakelists.txt.tera", include_str!("templates/cmakelists.txt.tera")),
    ("readme.md.tera", include_str!("templates/readme.md.tera")),
    ("test.cpp.tera", include_str!("templates/test.cpp.tera")),
];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What kind of package to scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    #[default]
    Library,
    Executable,
}

/// Template context for one new package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageContext {
    pub pkg_name: String,
    pub kind: PackageKind,
    pub maintainer_name: String,
    pub maintainer_email: String,
}

/// The scaffolding engine; construct once, render per package.
pub struct Scaffold {
    tera: Tera,
}

impl Scaffold {
    pub fn new() -> Result<Self, ScaffoldError> {
        let mut tera = Tera::default();
        let items: Vec<(String, String)> = TPLS
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        tera.add_raw_templates(items)?;
        Ok(Self { tera })
    }

    /// Render every file for `ctx`, as `(relative path, content)` pairs.
    pub fn render(&self, ctx: &PackageContext) -> Result<Vec<(PathBuf, String)>, ScaffoldError> {
        let tctx = tera::Context::from_serialize(ctx)?;
        let mut files = vec![
            (
                PathBuf::from("package.xml"),
                self.tera.render("package.xml.tera", &tctx)?,
            ),
            (
                PathBuf::from("CMakeLists.txt"),
                self.tera.render("cmakelists.txt.tera", &tctx)?,
            ),
            (
                PathBuf::from("README.md"),
                self.tera.render("readme.md.tera", &tctx)?,
            ),
            (
                PathBuf::from("test").join(format!("test_{}.cpp", ctx.pkg_name)),
                self.tera.render("test.cpp.tera", &tctx)?,
            ),
            (PathBuf::from("src").join(".gitignore"), String::new()),
        ];
        if ctx.kind == PackageKind::Library {
            files.push((
                PathBuf::from("include").join(&ctx.pkg_name).join(".gitignore"),
                String::new(),
            ));
        }
        Ok(files)
    }

    /// Create the package directory under `parent` and write every rendered
    /// file into it.
    ///
    /// Refuses with [`ScaffoldError::PackageExists`] if the directory is
    /// already there; nothing is ever overwritten.
    pub fn write_into(&self, ctx: &PackageContext, parent: &Path) -> Result<PathBuf, ScaffoldError> {
        let pkg_dir = parent.join(&ctx.pkg_name);
        if pkg_dir.exists() {
            return Err(ScaffoldError::PackageExists { path: pkg_dir });
        }

        for (rel, content) in self.render(ctx)? {
            let target = pkg_dir.join(&rel);
            if let Some(dir) = target.parent() {
                std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            }
            std::fs::write(&target, content).map_err(|e| io_err(&target, e))?;
        }
        Ok(pkg_dir)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
