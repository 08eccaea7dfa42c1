use serde::{Deserialize, Serialize};

/// The three dependency phases of a recipe.
///
/// `build` is what the build machine needs, `host` what the build
/// environment needs, and `run` what the installed package needs at
/// runtime. Kiln validates and reports these lists; resolving them is an
/// external solver's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementsSection {
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default)]
    pub host: Vec<String>,
    #[serde(default)]
    pub run: Vec<String>,
}

impl RequirementsSection {
    /// The phases in declaration order, named for diagnostics.
    pub fn phases(&self) -> [(&'static str, &[String]); 3] {
        [
            ("build", self.build.as_slice()),
            ("host", self.host.as_slice()),
            ("run", self.run.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_named_in_order() {
        let reqs = RequirementsSection {
            run: vec!["numpy".into()],
            ..Default::default()
        };
        let phases = reqs.phases();
        assert_eq!(phases[0].0, "build");
        assert_eq!(phases[2].0, "run");
        assert_eq!(phases[2].1, ["numpy".to_string()]);
    }
}
