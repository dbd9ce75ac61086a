// rowfont
// Copyright 2025 The rowfont Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Integration tests that use golden input and output files.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use std::env;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

/// Matches a version number.
const VERSION_RE: &str = "[0-9]+\\.[0-9]+\\.[0-9]+";

/// Message for a missing file as printed by the standard library.
#[cfg(target_os = "windows")]
const ENOENT: &str = "The system cannot find the file specified. (os error 2)";

/// Message for a missing file as printed by the standard library.
#[cfg(not(target_os = "windows"))]
const ENOENT: &str = "No such file or directory (os error 2)";

/// Computes the path to the directory where this test's binary lives.
fn self_dir() -> PathBuf {
    let self_exe = env::current_exe().expect("Cannot get self's executable path");
    let dir = self_exe.parent().expect("Cannot get self's directory");
    assert!(dir.ends_with("target/debug/deps") || dir.ends_with("target/release/deps"));
    dir.to_owned()
}

/// Computes the path to the built binary `name`.
fn bin_path<P: AsRef<Path>>(name: P) -> PathBuf {
    let test_dir = self_dir();
    let debug_or_release_dir = test_dir.parent().expect("Failed to get parent directory");
    debug_or_release_dir.join(name).with_extension(env::consts::EXE_EXTENSION)
}

/// Computes the path to the source file `name`.
fn src_path(name: &str) -> PathBuf {
    let test_dir = self_dir();
    let debug_or_release_dir = test_dir.parent().expect("Failed to get parent directory");
    let target_dir = debug_or_release_dir.parent().expect("Failed to get parent directory");
    let dir = target_dir.parent().expect("Failed to get parent directory");

    // Sanity-check that we landed in the right location.
    assert!(dir.join("Cargo.toml").exists());

    dir.join(name)
}

/// Describes the expected contents of one of the output streams (stdout, stderr) of a program.
enum Behavior {
    /// Ensure the stream is silent.
    Null,

    /// Expect the contents of the stream to match this file.
    File(PathBuf),

    /// Expect the contents of the stream to match this literal string.
    Literal(String),
}

/// Reads the contents of a golden data file.
fn read_golden(path: &Path) -> String {
    let mut f = File::open(path).expect("Failed to open golden data file");
    let mut golden = vec![];
    f.read_to_end(&mut golden).expect("Failed to read golden data file");
    let raw = String::from_utf8(golden).expect("Golden data file is not valid UTF-8");
    let golden = if cfg!(target_os = "windows") { raw.replace("\r\n", "\n") } else { raw };

    // This is the opposite of apply_mocks and ensures we don't leak actual values into the golden
    // files by mistake.
    let version_re = regex::Regex::new(VERSION_RE).unwrap();
    assert!(
        !version_re.is_match(&golden),
        "Golden file {} contains a version number",
        path.display()
    );

    golden
}

/// Replaces the parts of the output that can change due to the environment with placeholders.
fn apply_mocks(input: String) -> String {
    let version_re = regex::Regex::new(VERSION_RE).unwrap();
    version_re.replace_all(&input, "X.Y.Z").into_owned()
}

/// Runs `bin` with arguments `args` from within `cwd` and returns its exit code, stdout and
/// stderr, with the latter two passed through `apply_mocks`.
fn run<P: AsRef<Path>>(bin: P, args: &[&str], cwd: &Path) -> (i32, String, String) {
    let result = process::Command::new(bin.as_ref())
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .stdin(process::Stdio::null())
        .output()
        .expect("Failed to execute subprocess");
    let code = result.status.code().expect("Subprocess didn't exit cleanly");
    let stdout =
        apply_mocks(String::from_utf8(result.stdout).expect("Stdout not is not valid UTF-8"));
    let stderr =
        apply_mocks(String::from_utf8(result.stderr).expect("Stderr not is not valid UTF-8"));
    (code, stdout, stderr)
}

/// Runs `bin` with arguments `args` from within `cwd` and checks its behavior against
/// expectations.
///
/// `exp_code` is the expected error code from the program.  `stdout_behavior` and
/// `stderr_behavior` indicate what to expect from the program's textual output.
fn check<P: AsRef<Path>>(
    bin: P,
    args: &[&str],
    cwd: &Path,
    exp_code: i32,
    stdout_behavior: Behavior,
    stderr_behavior: Behavior,
) {
    let exp_stdout = match stdout_behavior {
        Behavior::Null => "".to_owned(),
        Behavior::File(path) => read_golden(&path),
        Behavior::Literal(text) => text,
    };

    let exp_stderr = match stderr_behavior {
        Behavior::Null => "".to_owned(),
        Behavior::File(path) => read_golden(&path),
        Behavior::Literal(text) => text,
    };

    let (code, stdout, stderr) = run(bin, args, cwd);
    if exp_code != code || exp_stdout != stdout || exp_stderr != stderr {
        eprintln!("Exit code: {}", code);
        eprintln!("stdout:\n{}", stdout);
        eprintln!("stderr:\n{}", stderr);
        assert_eq!(exp_code, code);
        assert_eq!(exp_stdout, stdout);
        assert_eq!(exp_stderr, stderr);
    }
}

/// Runs `rowfont-check` from within the directory that holds its golden files.
fn check_header(
    args: &[&str],
    exp_code: i32,
    stdout_behavior: Behavior,
    stderr_behavior: Behavior,
) {
    check(
        bin_path("rowfont-check"),
        args,
        &src_path("cli/tests/check"),
        exp_code,
        stdout_behavior,
        stderr_behavior,
    );
}

/// Runs `rowfont-encode` from within a scratch directory, which is returned for inspection.
fn check_encode(
    args: &[&str],
    exp_code: i32,
    stdout_behavior: Behavior,
    stderr_behavior: Behavior,
) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    check(bin_path("rowfont-encode"), args, dir.path(), exp_code, stdout_behavior, stderr_behavior);
    dir
}

/// Syntactic sugar to build the expected stderr of a usage error in `program`.
fn usage_error(program: &str, message: &str) -> Behavior {
    Behavior::Literal(format!(
        "Usage error: {}\nType {} --help for more information\n",
        message, program
    ))
}

#[test]
fn test_check_samples() {
    check_header(
        &["ab-8x8.h"],
        0,
        Behavior::File(src_path("cli/tests/check/ab-8x8.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_debug_logging() {
    let result = process::Command::new(bin_path("rowfont-check"))
        .arg("ab-8x8.h")
        .current_dir(src_path("cli/tests/check"))
        .env("RUST_LOG", "rowfont_check=debug")
        .stdin(process::Stdio::null())
        .output()
        .expect("Failed to execute subprocess");
    assert_eq!(Some(0), result.status.code());
    let stderr = String::from_utf8(result.stderr).expect("Stderr not is not valid UTF-8");
    assert!(stderr.contains("Parsed 2 glyphs from ab-8x8.h"), "{}", stderr);
}

#[test]
fn test_check_one_char() {
    fn check_with_args(args: &[&str]) {
        check_header(
            args,
            0,
            Behavior::File(src_path("cli/tests/check/ab-8x8-char.out")),
            Behavior::Null,
        );
    }
    check_with_args(&["--char", "B", "ab-8x8.h"]);
    check_with_args(&["-c", "0x42", "ab-8x8.h"]);
    check_with_args(&["ab-8x8.h", "-c0x42"]);
}

#[test]
fn test_check_all_chars() {
    check_header(
        &["--all", "ab-8x8.h"],
        0,
        Behavior::File(src_path("cli/tests/check/ab-8x8-all.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_char_not_found() {
    check_header(
        &["-c", "Z", "ab-8x8.h"],
        1,
        Behavior::File(src_path("cli/tests/check/char-not-found.out")),
        Behavior::Literal("rowfont-check: Character 'Z' not found in font\n".to_owned()),
    );
}

#[test]
fn test_check_count_mismatch() {
    check_header(
        &["count-mismatch.h"],
        1,
        Behavior::File(src_path("cli/tests/check/count-mismatch.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_sequence_break() {
    check_header(
        &["sequence-break.h"],
        1,
        Behavior::File(src_path("cli/tests/check/sequence-break.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_malformed_metadata() {
    check_header(
        &["no-size.h"],
        1,
        Behavior::File(src_path("cli/tests/check/no-size.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_truncated() {
    check_header(
        &["truncated.h"],
        1,
        Behavior::File(src_path("cli/tests/check/truncated.out")),
        Behavior::Null,
    );
}

#[test]
fn test_check_missing_file() {
    check_header(
        &["does-not-exist.h"],
        1,
        Behavior::Null,
        Behavior::Literal(format!("rowfont-check: Cannot open does-not-exist.h: {}\n", ENOENT)),
    );
}

#[test]
fn test_check_usage_errors() {
    check_header(&[], 2, Behavior::Null, usage_error("rowfont-check", "Missing font header file"));
    check_header(
        &["a.h", "b.h"],
        2,
        Behavior::Null,
        usage_error("rowfont-check", "Too many arguments"),
    );
    check_header(
        &["-Z", "a.h"],
        2,
        Behavior::Null,
        usage_error("rowfont-check", "Unrecognized option: 'Z'"),
    );
    check_header(
        &["--char", "AB", "ab-8x8.h"],
        2,
        Behavior::Null,
        usage_error(
            "rowfont-check",
            "Invalid character 'AB': must be a single character or a 0x-prefixed codepoint",
        ),
    );
}

#[test]
fn test_help() {
    for (program, synopsis) in
        &[("rowfont-check", "<font-header>"), ("rowfont-encode", "<font-file>")]
    {
        for flag in &["-h", "--help"] {
            let dir = tempfile::tempdir().unwrap();
            let (code, stdout, stderr) = run(bin_path(program), &[*flag, "extra"], dir.path());
            assert_eq!(0, code);
            assert!(stdout.starts_with(&format!("Usage: {} [options] {}\n", program, synopsis)));
            assert!(stdout.contains("--version"));
            assert_eq!("", stderr);
        }
    }
}

#[test]
fn test_version() {
    for program in &["rowfont-check", "rowfont-encode"] {
        let dir = tempfile::tempdir().unwrap();
        check(
            bin_path(program),
            &["--version"],
            dir.path(),
            0,
            Behavior::File(src_path("cli/tests/version.out")),
            Behavior::Null,
        );
    }
}

#[test]
fn test_encode_missing_required_options() {
    check_encode(
        &["font.ttf"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Missing required option --width"),
    );
    check_encode(
        &["-w", "8", "font.ttf"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Missing required option --height"),
    );
    check_encode(
        &["-w", "8", "-t", "8", "font.ttf"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Missing required option --output"),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Missing font file"),
    );
}

#[test]
fn test_encode_invalid_option_values() {
    check_encode(
        &["-w", "eight", "-t", "8", "-o", "font.h", "font.ttf"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Invalid value for --width: invalid digit found in string"),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h", "--start", "0xZZ", "font.ttf"],
        2,
        Behavior::Null,
        usage_error("rowfont-encode", "Invalid codepoint '0xZZ'"),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h", "--vertical", "middle", "font.ttf"],
        2,
        Behavior::Null,
        usage_error(
            "rowfont-encode",
            "Invalid value for --vertical: middle (must be ratio or ascent)",
        ),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h", "--horizontal", "left", "font.ttf"],
        2,
        Behavior::Null,
        usage_error(
            "rowfont-encode",
            "Invalid value for --horizontal: left (must be advance or ink)",
        ),
    );
}

#[test]
fn test_encode_invalid_table() {
    check_encode(
        &["-w", "65", "-t", "8", "-o", "font.h", "font.ttf"],
        1,
        Behavior::Null,
        Behavior::Literal(
            "rowfont-encode: Cell width must be between 1 and 64 pixels but got 65\n".to_owned(),
        ),
    );
    check_encode(
        &["-w", "8", "-t", "0", "-o", "font.h", "font.ttf"],
        1,
        Behavior::Null,
        Behavior::Literal(
            "rowfont-encode: Cell height must be between 1 and 64 pixels but got 0\n".to_owned(),
        ),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h", "--start", "0x7E", "--end", "0x20", "font.ttf"],
        1,
        Behavior::Null,
        Behavior::Literal(
            "rowfont-encode: End codepoint 0x20 must be >= start codepoint 0x7E\n".to_owned(),
        ),
    );
    check_encode(
        &["-w", "8", "-t", "8", "-o", "font.h", "-n", "my-font", "font.ttf"],
        1,
        Behavior::Null,
        Behavior::Literal(
            "rowfont-encode: Invalid table name 'my-font': must be a C identifier\n".to_owned(),
        ),
    );
}

#[test]
fn test_encode_missing_font() {
    let dir = check_encode(
        &["-w", "8", "-t", "16", "-o", "font.h", "missing.ttf"],
        1,
        Behavior::Null,
        Behavior::Literal(format!("rowfont-encode: Cannot load font missing.ttf: {}\n", ENOENT)),
    );
    assert!(!dir.path().join("font.h").exists());
}

#[test]
fn test_encode_real_font_then_check() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        src_path("ttf/testdata/DejaVuSansMono.ttf"),
        dir.path().join("DejaVuSansMono.ttf"),
    )
    .unwrap();

    let (code, stdout, stderr) = run(
        bin_path("rowfont-encode"),
        &[
            "-w",
            "8",
            "-t",
            "8",
            "--start",
            "0x41",
            "--end",
            "0x42",
            "--preview",
            "A",
            "-o",
            "font.h",
            "DejaVuSansMono.ttf",
        ],
        dir.path(),
    );
    assert_eq!("", stderr);
    assert_eq!(0, code);

    let (head, rest) = stdout
        .split_once("Preview of 'A' (0x41):\n========\n")
        .expect("Preview missing from output");
    let (art, tail) = rest.split_once("========\n\nGenerating").expect("Preview not terminated");
    assert_eq!(
        format!(
            "{0}\nBitmap Font Encoder\n{0}\n\
             Input:  DejaVuSansMono.ttf\n\
             Font:   DejaVu Sans Mono\n\
             Output: font.h\n\
             Size:   8x8 pixels\n\
             Range:  0x41..0x42 (2 characters)\n\
             Name:   rm690b0_font_8x8\n\
             {0}\n\
             \nConverting font...\n\
             Converted 2 characters\n\n",
            "=".repeat(60)
        ),
        head
    );
    assert_eq!(
        " header file: font.h\n\
         \nDone!\n\
         Generated 2 characters\n\
         Bytes per character: 8\n\
         Total size: 16 bytes\n\
         \nTo use in your code:\n\
         \x20 #include \"font.h\"\n\
         \x20 const uint8_t *glyph = rm690b0_font_8x8_data[codepoint - 0x41];\n",
        tail
    );
    let lines: Vec<&str> = art.lines().collect();
    assert_eq!(8, lines.len(), "Unexpected preview:\n{}", art);
    for line in &lines {
        assert_eq!(8, line.chars().count(), "Unexpected preview:\n{}", art);
        assert!(line.chars().all(|c| c == '#' || c == '.'), "Unexpected preview:\n{}", art);
    }
    assert!(art.contains('#'), "Blank preview");

    let (code, stdout, stderr) =
        run(bin_path("rowfont-check"), &["--char", "A", "font.h"], dir.path());
    assert_eq!("", stderr);
    assert_eq!(0, code);
    assert!(stdout.contains("  Font:       DejaVuSansMono.ttf\n"), "{}", stdout);
    assert!(stdout.contains("  ✓ Codepoint sequence is continuous\n"), "{}", stdout);
    assert!(stdout.contains("Test completed successfully!\n"), "{}", stdout);
    let blocks = art.replace('#', "█").replace('.', "·");
    assert!(
        stdout.contains(&format!("Character Preview: 'A' (0x41)\n{}\n{}", "─".repeat(8), blocks)),
        "Preview differs from encoder output:\n{}",
        stdout
    );
}
