//! Profiles compiled into the binary

/// Key of the profile used when none is requested
pub const DEFAULT_PROFILE: &str = "express-ts";

/// A profile directory embedded at compile time
#[derive(Debug)]
pub struct BuiltinProfile {
    /// Lookup key used on the command line
    pub key: &'static str,
    /// (file name, contents) pairs, including `profile.yaml`
    files: &'static [(&'static str, &'static str)],
}

impl BuiltinProfile {
    pub fn file(&self, name: &str) -> Option<&'static str> {
        self.files
            .iter()
            .find(|(file, _)| *file == name)
            .map(|(_, contents)| *contents)
    }
}

pub static BUILTIN_PROFILES: &[BuiltinProfile] = &[
    BuiltinProfile {
        key: "express-ts",
        files: &[
            ("profile.yaml", include_str!("../../templates/express-ts/profile.yaml")),
            ("tsconfig.json", include_str!("../../templates/express-ts/tsconfig.json")),
            ("nodemon.json", include_str!("../../templates/express-ts/nodemon.json")),
            ("eslintignore", include_str!("../../templates/express-ts/eslintignore")),
            ("gitignore", include_str!("../../templates/express-ts/gitignore")),
            ("index.ts", include_str!("../../templates/express-ts/index.ts")),
        ],
    },
    BuiltinProfile {
        key: "express-ts-gzip",
        files: &[
            ("profile.yaml", include_str!("../../templates/express-ts-gzip/profile.yaml")),
            ("tsconfig.json", include_str!("../../templates/express-ts-gzip/tsconfig.json")),
            ("nodemon.json", include_str!("../../templates/express-ts-gzip/nodemon.json")),
            ("gitignore", include_str!("../../templates/express-ts-gzip/gitignore")),
            ("index.ts", include_str!("../../templates/express-ts-gzip/index.ts")),
        ],
    },
];

pub fn find(key: &str) -> Option<&'static BuiltinProfile> {
    BUILTIN_PROFILES.iter().find(|p| p.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_exists() {
        assert!(find(DEFAULT_PROFILE).is_some());
    }

    #[test]
    fn test_file_lookup() {
        let profile = find("express-ts").unwrap();
        assert!(profile.file("profile.yaml").is_some());
        assert!(profile.file("missing.txt").is_none());
    }
}
