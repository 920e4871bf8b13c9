use std::{env, fs, path::PathBuf};

use proc_macro2::{Ident, Span};
use syn::Path;
use toml_edit::{DocumentMut, Item};

const FACADE: &str = "nova";
const SECTIONS: [&str; 2] = ["dependencies", "dev-dependencies"];

/// Dependency sections of the `Cargo.toml` a macro is expanding for.
pub struct Manifest {
  doc: Option<DocumentMut>,
}

impl Default for Manifest {
  fn default() -> Self {
    Self::load()
  }
}

impl Manifest {
  /// Reads `$CARGO_MANIFEST_DIR/Cargo.toml`. A missing or malformed manifest resolves
  /// every crate to its own name.
  pub fn load() -> Self {
    let doc = env::var_os("CARGO_MANIFEST_DIR")
      .map(|dir| PathBuf::from(dir).join("Cargo.toml"))
      .and_then(|path| fs::read_to_string(path).ok())
      .and_then(|content| content.parse::<DocumentMut>().ok());

    Self { doc }
  }

  pub fn parse(content: &str) -> Option<Self> {
    Some(Self {
      doc: Some(content.parse().ok()?),
    })
  }

  /// How generated code names `krate`.
  ///
  /// A direct dependency keeps the name it was declared under, renames included.
  /// Without one, `nova_ecs` is reached as `nova::ecs` through the facade. Crates that
  /// depend on neither (the crate's own tests) get `krate` back unchanged.
  pub fn get_path(&self, krate: &str) -> Path {
    self
      .try_get_path(krate)
      .unwrap_or_else(|| crate_path(krate))
  }

  pub fn try_get_path(&self, krate: &str) -> Option<Path> {
    if let Some(local) = self.local_name(krate) {
      return Some(crate_path(&local));
    }

    let facade = self.local_name(FACADE)?;
    let module = krate.strip_prefix("nova_")?;
    syn::parse_str(&format!("{}::{}", facade, module)).ok()
  }

  /// The key `package` is declared under, `-` mapped to `_`.
  fn local_name(&self, package: &str) -> Option<String> {
    let doc = self.doc.as_ref()?;

    SECTIONS
      .iter()
      .filter_map(|section| doc.get(section)?.as_table_like())
      .find_map(|deps| {
        deps.iter().find_map(|(key, dep)| {
          let declared = dep.get("package").and_then(Item::as_str).unwrap_or(key);
          (declared == package).then(|| key.replace('-', "_"))
        })
      })
  }
}

fn crate_path(name: &str) -> Path {
  Path::from(Ident::new(name, Span::call_site()))
}
