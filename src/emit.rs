// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ctype::needs_import;
use crate::expr::Translator;
use crate::naming::to_display_name;
use crate::{Binding, Config, Emit, GenerateError};
use log::{debug, info, warn};
use std::fs::{self, File, Permissions};
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn read_error(source: io::Error) -> GenerateError {
    GenerateError::ReadCall { source }
}

fn write_error(source: io::Error) -> GenerateError {
    GenerateError::WriteCall { source }
}

fn render_header(bindings: &[Binding], config: &Config) -> String {
    let mut header = String::new();
    for lint in config.allow() {
        header.push_str(&format!("#![allow({lint})]\n"));
    }
    if !header.is_empty() {
        header.push('\n');
    }
    header.push_str(&format!("use {};\n", config.flags_import()));
    // Importing the same name twice does not compile.
    let mut imported: Vec<&str> = Vec::new();
    for binding in bindings {
        let underlying_type = binding.underlying_type();
        if needs_import(underlying_type) && !imported.contains(&underlying_type) {
            header.push_str(&format!(
                "use {}::{underlying_type};\n",
                config.types_crate()
            ));
            imported.push(underlying_type);
        }
    }
    header
}

fn render_block<R>(input: &mut R, binding: &Binding, config: &Config) -> Result<String, GenerateError>
where
    R: BufRead,
{
    let flags_macro = config
        .flags_import()
        .rsplit("::")
        .next()
        .unwrap_or_default();
    let visibility = if config.emit().contains(Emit::Public) {
        "pub "
    } else {
        ""
    };
    let type_name = binding.type_name();

    let mut block = format!("\n{flags_macro}! {{\n");
    if !config.derives().is_empty() {
        block.push_str(&format!("    #[derive({})]\n", config.derives().join(", ")));
    }
    block.push_str(&format!(
        "    {visibility}struct {type_name}: {} {{\n",
        binding.underlying_type()
    ));

    let translator = Translator::new(binding, config.policy());
    let mut members: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).map_err(read_error)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let Some(found) = binding.match_define(line) else {
            continue;
        };

        let member = to_display_name(found.name);
        let value = translator
            .translate(found.value, &members)
            .map_err(|source| GenerateError::Translate {
                name: found.name.to_string(),
                source,
            })?;
        debug!("{type_name}::{member} = {value}");

        if !members.is_empty() {
            block.push('\n');
        }
        if let Some(comment) = found.comment {
            if config.emit().contains(Emit::Comments) {
                block.push_str(&format!("        {comment}\n"));
            }
        }
        block.push_str(&format!("        const {member} = {value};\n"));
        members.push(member);
    }
    block.push_str("    }\n}\n");

    if members.is_empty() {
        warn!(
            "{type_name}: no constant matches the prefix \"{}\"",
            binding.prefix()
        );
    } else {
        info!("{type_name}: {} flags", members.len());
    }
    Ok(block)
}

/// Writes one flag type per binding, extracted from the `#define` lines of `input`.
///
/// The whole input is scanned once per binding and rewound afterwards, so several flag types
/// can be extracted from the same header.  Lines that don't define a constant of the binding
/// are ignored.  Each block is written as soon as it is complete: output written before an
/// error is left as is.
pub fn write_flags<R, W>(
    input: &mut R,
    output: &mut W,
    bindings: &[Binding],
    config: &Config,
) -> Result<(), GenerateError>
where
    R: BufRead + Seek,
    W: Write,
{
    output
        .write_all(render_header(bindings, config).as_bytes())
        .map_err(write_error)?;
    for binding in bindings {
        let block = render_block(input, binding, config)?;
        output.write_all(block.as_bytes()).map_err(write_error)?;
        input.seek(SeekFrom::Start(0)).map_err(read_error)?;
    }
    Ok(())
}

fn open_source(input_path: &Path) -> Result<BufReader<File>, GenerateError> {
    File::open(input_path)
        .map(BufReader::new)
        .map_err(|source| GenerateError::SourceNotFound {
            source,
            path: input_path.to_path_buf(),
        })
}

/// Generates the flag types of `bindings` from the header at `input_path` into `output_path`.
///
/// The output is only created once the header is opened: a missing header leaves an existing
/// output untouched.
pub fn generate<P, Q>(
    input_path: P,
    output_path: Q,
    bindings: &[Binding],
    config: &Config,
) -> Result<(), GenerateError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_path = output_path.as_ref();
    let mut input = open_source(input_path.as_ref())?;
    let file = File::create(output_path).map_err(|source| GenerateError::CreateOutput {
        source,
        path: output_path.to_path_buf(),
    })?;
    let mut output = BufWriter::new(file);
    write_flags(&mut input, &mut output, bindings, config)?;
    output.flush().map_err(write_error)
}

// Keeps the permissions of a previous output, or those of a newly created file.
fn output_permissions(output_path: &Path) -> Option<Permissions> {
    match fs::metadata(output_path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// Same as [`generate()`] but writes to a temporary file next to `output_path` and renames it
/// over `output_path` once complete.
pub fn generate_atomic<P, Q>(
    input_path: P,
    output_path: Q,
    bindings: &[Binding],
    config: &Config,
) -> Result<(), GenerateError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let output_path = output_path.as_ref();
    let mut input = open_source(input_path.as_ref())?;
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|source| GenerateError::CreateOutput {
        source,
        path: dir.to_path_buf(),
    })?;
    {
        let mut output = BufWriter::new(&mut temp);
        write_flags(&mut input, &mut output, bindings, config)?;
        output.flush().map_err(write_error)?;
    }
    // Temporary files are only readable by their owner.
    if let Some(permissions) = output_permissions(output_path) {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(write_error)?;
    }
    temp.persist(output_path)
        .map_err(|e| GenerateError::Persist {
            source: e.error,
            path: output_path.to_path_buf(),
        })?;
    Ok(())
}

/// Checks that `output_path` holds exactly what [`generate()`] would write.
///
/// A missing output is out of date.
pub fn is_up_to_date<P, Q>(
    input_path: P,
    output_path: Q,
    bindings: &[Binding],
    config: &Config,
) -> Result<bool, GenerateError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut input = open_source(input_path.as_ref())?;
    let mut expected = Vec::new();
    write_flags(&mut input, &mut expected, bindings, config)?;
    match fs::read(output_path.as_ref()) {
        Ok(current) => Ok(current == expected),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(GenerateError::ReadCall { source }),
    }
}
