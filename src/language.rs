//! Language and runner catalogs
//!
//! Static metadata for the languages the FaaS can load and the package
//! runners that install their dependencies, plus runner detection over a
//! file listing.

use std::path::Path;

use crate::deployment::LanguageId;

/// Package runner identifier.
///
/// A runner names the dependency installer for a language ecosystem; the
/// server picks install steps from the runner tags sent with an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerId {
    NodeJs,
    Python,
    Ruby,
    CSharp,
}

/// Static descriptor of one package runner
#[derive(Debug, Clone, Copy)]
pub struct RunnerInfo {
    pub id: RunnerId,
    pub language_id: LanguageId,
    /// Exact manifest file names that mark a package for this runner
    pub manifest_files: &'static [&'static str],
    /// Manifest file suffixes, for ecosystems with variable file names
    pub manifest_suffixes: &'static [&'static str],
    pub install_command: &'static str,
    pub display_name: &'static str,
}

const NODEJS: RunnerInfo = RunnerInfo {
    id: RunnerId::NodeJs,
    language_id: LanguageId::Node,
    manifest_files: &["package.json"],
    manifest_suffixes: &[],
    install_command: "npm install",
    display_name: "NPM",
};

const PYTHON: RunnerInfo = RunnerInfo {
    id: RunnerId::Python,
    language_id: LanguageId::Py,
    manifest_files: &["requirements.txt"],
    manifest_suffixes: &[],
    install_command: "pip install -r requirements.txt",
    display_name: "Pip",
};

const RUBY: RunnerInfo = RunnerInfo {
    id: RunnerId::Ruby,
    language_id: LanguageId::Rb,
    manifest_files: &["Gemfile"],
    manifest_suffixes: &[],
    install_command: "bundle install",
    display_name: "Gem",
};

const CSHARP: RunnerInfo = RunnerInfo {
    id: RunnerId::CSharp,
    language_id: LanguageId::Cs,
    manifest_files: &["project.json"],
    manifest_suffixes: &[".csproj"],
    install_command: "dotnet restore",
    display_name: "NuGet",
};

impl RunnerId {
    pub const ALL: [RunnerId; 4] = [
        RunnerId::NodeJs,
        RunnerId::Python,
        RunnerId::Ruby,
        RunnerId::CSharp,
    ];

    /// Wire tag sent to the server with uploads
    pub fn tag(&self) -> &'static str {
        match self {
            RunnerId::NodeJs => "nodejs",
            RunnerId::Python => "python",
            RunnerId::Ruby => "ruby",
            RunnerId::CSharp => "csharp",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.tag() == tag)
    }

    pub fn info(&self) -> &'static RunnerInfo {
        match self {
            RunnerId::NodeJs => &NODEJS,
            RunnerId::Python => &PYTHON,
            RunnerId::Ruby => &RUBY,
            RunnerId::CSharp => &CSHARP,
        }
    }
}

/// Static descriptor of one loadable language
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo {
    /// Wire tag, identical to the serialized [`LanguageId`]
    pub tag: &'static str,
    pub display_name: &'static str,
    pub hex_color: &'static str,
    /// File extensions loadable by this language; empty means any
    pub file_exts: &'static [&'static str],
    pub runner: Option<RunnerId>,
}

impl LanguageId {
    pub const ALL: [LanguageId; 8] = [
        LanguageId::Node,
        LanguageId::Ts,
        LanguageId::Rb,
        LanguageId::Py,
        LanguageId::Cs,
        LanguageId::Cob,
        LanguageId::File,
        LanguageId::Rpc,
    ];

    pub fn info(&self) -> &'static LanguageInfo {
        match self {
            LanguageId::Node => &LanguageInfo {
                tag: "node",
                display_name: "NodeJS",
                hex_color: "#3c873a",
                file_exts: &["js"],
                runner: Some(RunnerId::NodeJs),
            },
            LanguageId::Ts => &LanguageInfo {
                tag: "ts",
                display_name: "TypeScript",
                hex_color: "#007acc",
                file_exts: &["ts", "tsx"],
                runner: Some(RunnerId::NodeJs),
            },
            LanguageId::Rb => &LanguageInfo {
                tag: "rb",
                display_name: "Ruby",
                hex_color: "#e53935",
                file_exts: &["rb"],
                runner: Some(RunnerId::Ruby),
            },
            LanguageId::Py => &LanguageInfo {
                tag: "py",
                display_name: "Python",
                hex_color: "#ffd43b",
                file_exts: &["py"],
                runner: Some(RunnerId::Python),
            },
            LanguageId::Cs => &LanguageInfo {
                tag: "cs",
                display_name: "C#",
                hex_color: "#953dac",
                file_exts: &["cs"],
                runner: Some(RunnerId::CSharp),
            },
            LanguageId::Cob => &LanguageInfo {
                tag: "cob",
                display_name: "Cobol",
                hex_color: "#01325a",
                file_exts: &["cob", "cbl"],
                runner: None,
            },
            LanguageId::File => &LanguageInfo {
                tag: "file",
                display_name: "Static Files",
                hex_color: "#de5500",
                file_exts: &[],
                runner: None,
            },
            LanguageId::Rpc => &LanguageInfo {
                tag: "rpc",
                display_name: "RPC",
                hex_color: "#0f564d",
                file_exts: &["rpc"],
                runner: None,
            },
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.info().tag == tag)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.info().display_name == name)
    }

    /// Whether a file with the given extension is loadable by this language.
    /// The file loader accepts any extension.
    pub fn matches_ext(&self, ext: &str) -> bool {
        let exts = self.info().file_exts;
        if exts.is_empty() {
            !ext.is_empty()
        } else {
            exts.contains(&ext)
        }
    }
}

/// Runners whose manifest appears in `files`, in first-seen order.
///
/// Only the file name is considered, so entries may carry directory paths.
pub fn detect_runners<S: AsRef<str>>(files: &[S]) -> Vec<RunnerId> {
    let mut found = Vec::new();
    for file in files {
        let name = match Path::new(file.as_ref()).file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        for id in RunnerId::ALL {
            let info = id.info();
            let hit = info.manifest_files.contains(&name)
                || info.manifest_suffixes.iter().any(|s| name.ends_with(s));
            if hit && !found.contains(&id) {
                found.push(id);
            }
        }
    }
    found
}

/// Human-readable name for a runner tag, used when labeling install steps
pub fn runner_display_name(tag: &str) -> &'static str {
    RunnerId::from_tag(tag)
        .map(|id| id.info().display_name)
        .unwrap_or("Build")
}
