//! `tsconfig.json` discovery and translation into host compiler options.

use crate::kernel::services::ports::editor::{
    CompilerOptions, JsxEmit, ModuleKind, ModuleResolution, ScriptTarget,
};
use crate::kernel::services::ports::fs::{find_up, FileError, FileSystem};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const TSCONFIG_FILE: &str = "tsconfig.json";

#[derive(Debug, thiserror::Error)]
pub enum TsconfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: FileError,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: `compilerOptions` must be an object", path.display())]
    InvalidCompilerOptions { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTsconfig {
    pub path: PathBuf,
    /// `None` when the file has no `compilerOptions` section.
    pub options: Option<CompilerOptions>,
}

/// Finds the nearest `tsconfig.json` at or above `root` and translates it.
/// `Ok(None)` when there is none.
pub async fn resolve(
    fs: &dyn FileSystem,
    root: &Path,
) -> Result<Option<ResolvedTsconfig>, TsconfigError> {
    let Some(path) = find_up(fs, TSCONFIG_FILE, root).await else {
        return Ok(None);
    };
    let text = fs
        .read_text_file(&path)
        .await
        .map_err(|source| TsconfigError::Read {
            path: path.clone(),
            source,
        })?;
    let options = parse(&text).map_err(|e| match e {
        ParseFailure::Json(source) => TsconfigError::Parse {
            path: path.clone(),
            source,
        },
        ParseFailure::NotAnObject => TsconfigError::InvalidCompilerOptions { path: path.clone() },
    })?;
    tracing::debug!(path = %path.display(), has_options = options.is_some(), "tsconfig resolved");
    Ok(Some(ResolvedTsconfig { path, options }))
}

enum ParseFailure {
    Json(serde_json::Error),
    NotAnObject,
}

fn parse(text: &str) -> Result<Option<CompilerOptions>, ParseFailure> {
    let value: Value = serde_json::from_str(&strip_jsonc(text)).map_err(ParseFailure::Json)?;
    match value.get("compilerOptions") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(translate(map))),
        Some(_) => Err(ParseFailure::NotAnObject),
    }
}

/// Converts a raw `compilerOptions` object. Keys or values without a typed
/// counterpart land in `extra` unchanged.
pub fn translate(raw: &Map<String, Value>) -> CompilerOptions {
    let mut options = CompilerOptions::default();

    for (key, value) in raw {
        let handled = match key.as_str() {
            "target" => set(&mut options.target, str_enum(value, script_target)),
            "module" => set(&mut options.module, str_enum(value, module_kind)),
            "moduleResolution" => set(
                &mut options.module_resolution,
                str_enum(value, module_resolution),
            ),
            "jsx" => set(&mut options.jsx, str_enum(value, jsx_emit)),
            "strict" => set(&mut options.strict, value.as_bool()),
            "allowJs" => set(&mut options.allow_js, value.as_bool()),
            "baseUrl" => set(&mut options.base_url, value.as_str().map(str::to_string)),
            "paths" => match paths(value) {
                Some(paths) => {
                    options.paths = paths;
                    true
                }
                None => false,
            },
            "lib" => set_vec(&mut options.lib, value),
            "types" => set_vec(&mut options.types, value),
            _ => false,
        };
        if !handled {
            options.extra.insert(key.clone(), value.clone());
        }
    }

    options
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let found = value.is_some();
    if found {
        *slot = value;
    }
    found
}

fn set_vec(slot: &mut Vec<String>, value: &Value) -> bool {
    match string_list(value) {
        Some(list) => {
            *slot = list;
            true
        }
        None => false,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn paths(value: &Value) -> Option<std::collections::BTreeMap<String, Vec<String>>> {
    value
        .as_object()?
        .iter()
        .map(|(pattern, targets)| Some((pattern.clone(), string_list(targets)?)))
        .collect()
}

fn str_enum<T>(value: &Value, lookup: fn(&str) -> Option<T>) -> Option<T> {
    lookup(&value.as_str()?.to_ascii_lowercase())
}

fn script_target(name: &str) -> Option<ScriptTarget> {
    Some(match name {
        "es3" => ScriptTarget::Es3,
        "es5" => ScriptTarget::Es5,
        "es6" | "es2015" => ScriptTarget::Es2015,
        "es2016" => ScriptTarget::Es2016,
        "es2017" => ScriptTarget::Es2017,
        "es2018" => ScriptTarget::Es2018,
        "es2019" => ScriptTarget::Es2019,
        "es2020" => ScriptTarget::Es2020,
        "es2021" => ScriptTarget::Es2021,
        "es2022" => ScriptTarget::Es2022,
        "esnext" => ScriptTarget::EsNext,
        _ => return None,
    })
}

fn module_kind(name: &str) -> Option<ModuleKind> {
    Some(match name {
        "none" => ModuleKind::None,
        "commonjs" => ModuleKind::CommonJs,
        "amd" => ModuleKind::Amd,
        "umd" => ModuleKind::Umd,
        "system" => ModuleKind::System,
        "es6" | "es2015" => ModuleKind::Es2015,
        "es2020" => ModuleKind::Es2020,
        "es2022" => ModuleKind::Es2022,
        "esnext" => ModuleKind::EsNext,
        "node16" => ModuleKind::Node16,
        "nodenext" => ModuleKind::NodeNext,
        _ => return None,
    })
}

fn module_resolution(name: &str) -> Option<ModuleResolution> {
    match name {
        "classic" => Some(ModuleResolution::Classic),
        // The host only knows classic and node resolution.
        "bundler" | "node" | "node10" | "nodejs" | "node16" | "nodenext" => {
            Some(ModuleResolution::NodeJs)
        }
        _ => None,
    }
}

fn jsx_emit(name: &str) -> Option<JsxEmit> {
    Some(match name {
        "preserve" => JsxEmit::Preserve,
        "react" => JsxEmit::React,
        "react-native" => JsxEmit::ReactNative,
        "react-jsx" => JsxEmit::ReactJsx,
        "react-jsxdev" => JsxEmit::ReactJsxDev,
        _ => return None,
    })
}

/// Removes `//` and `/* */` comments and trailing commas outside string literals.
/// Newlines inside comments are kept so parse errors still point at the right line.
pub fn strip_jsonc(text: &str) -> String {
    let without_comments = strip_comments(text);
    strip_trailing_commas(&without_comments)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.get(i + 1) {
                    out.push(*escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }

    out
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/bootstrap/tsconfig.rs"]
mod tests;
