// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{generate, generate_atomic, is_up_to_date, Binding, BindingError, Config, GenerateError};
use log::info;
use std::path::{Path, PathBuf};

/// Default location of the Linux source tree.
pub const DEFAULT_LINUX_SRC: &str = "./linux";

/// How a [`Job`] writes its output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncates and writes the output in place.
    Direct,
    /// Writes to a temporary file renamed over the output.
    Atomic,
}

/// One header of the Linux source tree and the module generated from it.
#[derive(Debug, Clone)]
pub struct Job {
    header: PathBuf,
    output: PathBuf,
    bindings: Vec<Binding>,
}

impl Job {
    /// `header` is relative to the `include` directory of the source tree.
    pub fn new<H, O>(header: H, output: O, bindings: Vec<Binding>) -> Self
    where
        H: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        Job {
            header: header.into(),
            output: output.into(),
            bindings,
        }
    }

    pub fn header_path(&self, linux_src: &Path) -> PathBuf {
        linux_src.join("include").join(&self.header)
    }

    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.output)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn run(
        &self,
        linux_src: &Path,
        out_dir: &Path,
        mode: WriteMode,
        config: &Config,
    ) -> Result<(), GenerateError> {
        let header = self.header_path(linux_src);
        let output = self.output_path(out_dir);
        info!("Generating {} FFI…", header.display());
        match mode {
            WriteMode::Direct => generate(&header, &output, &self.bindings, config),
            WriteMode::Atomic => generate_atomic(&header, &output, &self.bindings, config),
        }
    }

    /// Returns `false` if the output differs from what [`run()`](Job::run) would write.
    pub fn check(&self, linux_src: &Path, out_dir: &Path, config: &Config) -> Result<bool, GenerateError> {
        is_up_to_date(
            self.header_path(linux_src),
            self.output_path(out_dir),
            &self.bindings,
            config,
        )
    }
}

/// Flag types of the clone and mount kernel interfaces.
pub fn default_jobs() -> Result<Vec<Job>, BindingError> {
    Ok(vec![
        Job::new(
            "uapi/linux/sched.h",
            "sched.rs",
            vec![Binding::new("CLONE", "c_uint")?],
        ),
        Job::new(
            "uapi/linux/mount.h",
            "mount.rs",
            vec![Binding::new("MS", "c_ulong")?],
        ),
        Job::new(
            "linux/fs.h",
            "fs.rs",
            vec![Binding::new("MNT|UMOUNT", "c_uint")?],
        ),
    ])
}

#[test]
fn job_paths() {
    let jobs = default_jobs().unwrap();
    assert_eq!(jobs.len(), 3);
    assert_eq!(
        jobs[0].header_path(Path::new(DEFAULT_LINUX_SRC)),
        Path::new("./linux/include/uapi/linux/sched.h")
    );
    assert_eq!(jobs[0].output_path(Path::new("gen")), Path::new("gen/sched.rs"));
    assert_eq!(jobs[2].bindings()[0].type_name(), "MntFlags");
}
