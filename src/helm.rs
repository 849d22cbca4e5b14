//! Invocation of `helm template` for a chart and a set of values files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use log::{debug, info, warn};

use crate::config::HelmOptions;
use crate::constants::YAML_EXTENSION;
use crate::error::{Error, Result};

/// Everything needed to render one test case.
#[derive(Debug, Clone)]
pub struct TemplateRequest {
    pub chart: PathBuf,
    pub release: String,
    pub namespace: String,
    pub values_files: Vec<PathBuf>,
}

impl TemplateRequest {
    /// Builds a request passing every `.yaml` file of `values_dir`, sorted by name.
    pub fn new<P: Into<PathBuf>, Q: AsRef<Path>>(
        chart: P,
        values_dir: Q,
        options: &HelmOptions,
    ) -> Result<Self> {
        Ok(Self {
            chart: chart.into(),
            release: options.release.clone(),
            namespace: options.namespace.clone(),
            values_files: values_files(values_dir.as_ref())?,
        })
    }
}

/// Returns the `.yaml` files of a values directory, sorted by name.
pub fn values_files(values_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(values_dir).map_err(|e| {
        Error::ConfigError(format!("could not read dir {}: {}", values_dir.display(), e))
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == YAML_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Trait for tools rendering a chart into a multi-document YAML stream.
pub trait TemplateRunner {
    /// Renders the chart of the request.
    ///
    /// # Returns
    /// * `Result<String>` - All rendered resources, separated by `---` lines
    fn template(&self, request: &TemplateRequest) -> Result<String>;
}

/// Major version of the helm client, which decides the shape of the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelmVersion {
    V2,
    V3,
}

impl HelmVersion {
    /// Parses the output of `helm version -c --short`.
    ///
    /// Helm 2 prints `Client: v2.16.1+gbbdfe5e`, anything else is taken as Helm 3.
    pub fn from_version_output(output: &str) -> Self {
        let fields: Vec<&str> = output.trim().split(' ').collect();
        match fields.get(1) {
            Some(version) if version.trim_start_matches('v').starts_with("2.") => Self::V2,
            _ => Self::V3,
        }
    }
}

/// Runs the helm binary found at `options.binary`.
pub struct HelmRunner {
    options: HelmOptions,
}

impl HelmRunner {
    pub fn new(options: HelmOptions) -> Self {
        Self { options }
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("{} {}", self.options.binary.display(), args.join(" "))
    }

    fn run(&self, args: &[String]) -> Result<Output> {
        let command_line = self.command_line(args);
        info!("Invoking: {}", command_line);
        let output = Command::new(&self.options.binary).args(args).output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!("{}", stderr.trim_end());
        }
        if !output.status.success() {
            return Err(Error::TemplateToolError {
                command: command_line,
                output: format!("{}{}", String::from_utf8_lossy(&output.stdout), stderr),
            });
        }
        Ok(output)
    }

    pub fn version(&self) -> Result<HelmVersion> {
        let args = ["version", "-c", "--short"].map(String::from);
        let output = self.run(&args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Helm version: {}", stdout.trim());
        Ok(HelmVersion::from_version_output(&stdout))
    }

    /// Fetches the dependencies of charts declaring them in `requirements.yaml`.
    pub fn build_dependencies(&self, chart: &Path) -> Result<()> {
        if !chart.join("requirements.yaml").exists() {
            return Ok(());
        }
        info!("Building helm dependencies of {}", chart.display());
        let args = vec!["dependency".to_string(), "build".to_string(), path_arg(chart)];
        self.run(&args).map(|_| ())
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Assembles the arguments of `helm template` for the given client version.
pub fn template_args(version: HelmVersion, request: &TemplateRequest) -> Vec<String> {
    let chart = path_arg(&request.chart);
    let mut args = match version {
        HelmVersion::V2 => {
            vec!["template".to_string(), "--name".to_string(), request.release.clone(), chart]
        }
        HelmVersion::V3 => vec![
            "template".to_string(),
            request.release.clone(),
            chart,
            "--namespace".to_string(),
            request.namespace.clone(),
        ],
    };
    for values_file in &request.values_files {
        args.push("--values".to_string());
        args.push(path_arg(values_file));
    }
    args
}

impl TemplateRunner for HelmRunner {
    fn template(&self, request: &TemplateRequest) -> Result<String> {
        let version = self.version()?;
        self.build_dependencies(&request.chart)?;
        let args = template_args(version, request);
        let output = self.run(&args)?;
        String::from_utf8(output.stdout).map_err(|e| Error::TemplateToolError {
            command: self.command_line(&args),
            output: format!("output is not valid UTF-8: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TemplateRequest {
        TemplateRequest {
            chart: PathBuf::from("/charts/app"),
            release: "myrel".to_string(),
            namespace: "jx".to_string(),
            values_files: vec![
                PathBuf::from("/t/values/a.yaml"),
                PathBuf::from("/t/values/b.yaml"),
            ],
        }
    }

    #[test]
    fn test_version_detection() {
        assert_eq!(
            HelmVersion::from_version_output("Client: v2.16.1+gbbdfe5e\n"),
            HelmVersion::V2
        );
        assert_eq!(HelmVersion::from_version_output("v3.14.0+g3fc9f4b\n"), HelmVersion::V3);
        assert_eq!(HelmVersion::from_version_output(""), HelmVersion::V3);
    }

    #[test]
    fn test_helm3_args() {
        let args = template_args(HelmVersion::V3, &request());
        assert_eq!(
            args,
            vec![
                "template",
                "myrel",
                "/charts/app",
                "--namespace",
                "jx",
                "--values",
                "/t/values/a.yaml",
                "--values",
                "/t/values/b.yaml",
            ]
        );
    }

    #[test]
    fn test_helm2_args() {
        let args = template_args(HelmVersion::V2, &request());
        assert_eq!(&args[..4], &["template", "--name", "myrel", "/charts/app"]);
        assert_eq!(args.len(), 8);
    }
}
