//! Built-in catalogue of sensitive file signatures.

use super::file::{PathPart, PathSignature};
use crate::error::SignatureError;

#[derive(Clone, Copy)]
enum Rule {
    Exact(&'static str),
    Regex(&'static str),
}

#[derive(Clone, Copy)]
struct BuiltinDef {
    part: PathPart,
    rule: Rule,
    description: &'static str,
    remark: Option<&'static str>,
}

const fn exact(part: PathPart, value: &'static str, description: &'static str) -> BuiltinDef {
    BuiltinDef {
        part,
        rule: Rule::Exact(value),
        description,
        remark: None,
    }
}

const fn regex(part: PathPart, pattern: &'static str, description: &'static str) -> BuiltinDef {
    BuiltinDef {
        part,
        rule: Rule::Regex(pattern),
        description,
        remark: None,
    }
}

const fn with_remark(def: BuiltinDef, remark: &'static str) -> BuiltinDef {
    BuiltinDef {
        remark: Some(remark),
        ..def
    }
}

const PRIVATE_KEY: &str = "Potential cryptographic private key";
const KEY_BUNDLE: &str = "Potential cryptographic key bundle";
const SHELL_HISTORY: &str = "Shell command history file";
const SHELL_CONFIG: &str = "Shell configuration file";

const BUILTIN: &[BuiltinDef] = &[
    exact(PathPart::Extension, "pem", PRIVATE_KEY),
    regex(PathPart::Extension, "^key(pair)?$", PRIVATE_KEY),
    exact(PathPart::Extension, "pkcs12", KEY_BUNDLE),
    exact(PathPart::Extension, "pfx", KEY_BUNDLE),
    exact(PathPart::Extension, "p12", KEY_BUNDLE),
    exact(PathPart::Extension, "asc", KEY_BUNDLE),
    regex(PathPart::Extension, "^(jks|keystore)$", "Java keystore file"),
    exact(PathPart::Filename, "otr.private_key", "Pidgin OTR private key"),
    regex(PathPart::Filename, r"^.*_rsa$", "Private SSH key"),
    regex(PathPart::Filename, r"^.*_dsa$", "Private SSH key"),
    regex(PathPart::Filename, r"^.*_ed25519$", "Private SSH key"),
    regex(PathPart::Filename, r"^.*_ecdsa$", "Private SSH key"),
    regex(PathPart::Path, r"\.?ssh/config$", "SSH configuration file"),
    regex(PathPart::Filename, r"^\.?(bash_|zsh_|sh_|z)?history$", SHELL_HISTORY),
    regex(PathPart::Filename, r"^\.?mysql_history$", "MySQL client command history file"),
    regex(PathPart::Filename, r"^\.?psql_history$", "PostgreSQL client command history file"),
    regex(PathPart::Filename, r"^\.?irb_history$", "Ruby IRB console history file"),
    regex(PathPart::Filename, r"^\.?(bash|zsh|csh)rc$", SHELL_CONFIG),
    regex(PathPart::Filename, r"^\.?(bash_|zsh_)?profile$", SHELL_CONFIG),
    regex(PathPart::Filename, r"^\.?(bash_|zsh_)?aliases$", "Shell command alias configuration file"),
    regex(PathPart::Path, r"\.?purple/accounts\.xml$", "Pidgin chat client account configuration file"),
    with_remark(
        regex(PathPart::Filename, r"^\.env(\..+)?$", "Environment configuration file"),
        "Often holds API keys and database passwords",
    ),
    regex(PathPart::Extension, "^kdbx?$", "KeePass password manager database file"),
    exact(PathPart::Filename, ".htpasswd", "Apache htpasswd file"),
    with_remark(
        regex(PathPart::Filename, r"^(\.|_)?netrc$", "Configuration file for auto-login process"),
        "Might contain username and password",
    ),
    exact(PathPart::Filename, ".git-credentials", "git-credential-store helper credentials file"),
    regex(PathPart::Path, r"\.?aws/credentials$", "AWS CLI credentials file"),
    exact(PathPart::Filename, ".pgpass", "PostgreSQL password file"),
    regex(PathPart::Filename, r"^\.?s3cfg$", "S3cmd configuration file"),
    exact(PathPart::Filename, "credentials.xml", "Jenkins publish over SSH plugin file"),
    exact(PathPart::Filename, ".dockercfg", "Docker configuration file"),
    exact(PathPart::Filename, ".npmrc", "NPM configuration file"),
    exact(PathPart::Filename, "shadow", "Unix shadow password file"),
    exact(PathPart::Extension, "ovpn", "OpenVPN client configuration file"),
    with_remark(
        exact(PathPart::Filename, "terraform.tfvars", "Terraform variable config file"),
        "Might contain credentials for terraform providers",
    ),
];

/// Compiles the built-in file signatures.
pub fn builtin_file_signatures() -> Result<Vec<PathSignature>, SignatureError> {
    BUILTIN
        .iter()
        .map(|def| {
            let remark = def.remark.map(str::to_string);
            match def.rule {
                Rule::Exact(value) => PathSignature::exact(def.part, value, def.description, remark),
                Rule::Regex(pattern) => PathSignature::regex(def.part, pattern, def.description, remark),
            }
        })
        .collect()
}
