use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn memshift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_memshift"))
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("Failed to create temp dir") }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    fn translate(&self, src_maps: &Path, dst_maps: &Path, extra: &[&str]) -> Output {
        memshift()
            .arg("translate")
            .arg(self.path("in.bin"))
            .arg(self.path("out.bin"))
            .arg("--src-maps")
            .arg(src_maps)
            .arg("--dst-maps")
            .arg(dst_maps)
            .args(extra)
            .output()
            .expect("Failed to run memshift")
    }
}

fn words64(values: &[u64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn read_words64(bytes: &[u8]) -> Vec<u64> {
    bytes.chunks_exact(8).map(|c| u64::from_le_bytes(c.try_into().unwrap())).collect()
}

#[test]
fn test_relocates_library_pointer() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "1000-2000 r-xp 00000000 08:01 42 /usr/lib/libfoo.so.1\n");
    let dst = ws.write("dst.maps", "5000-6000 r-xp 00000000 08:01 42 /usr/lib/libfoo.so.2\n");
    ws.write("in.bin", words64(&[0x1800, 0x9999, 0x1000, 0x2000]));

    let output = ws.translate(&src, &dst, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out = fs::read(ws.path("out.bin")).unwrap();
    assert_eq!(read_words64(&out), vec![0x5800, 0x9999, 0x5000, 0x6000]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File: /usr/lib/libfoo.so"));
    assert!(stdout.contains("Shift:       0x4000"));
}

#[test]
fn test_count_mismatch_fails_without_output() {
    let ws = Workspace::new();
    let src = ws.write(
        "src.maps",
        "1000-2000 r--p 00000000 08:01 7 /lib/libbar.so\n2000-3000 r-xp 00001000 08:01 7 /lib/libbar.so\n",
    );
    let dst = ws.write("dst.maps", "8000-9000 r--p 00000000 08:01 7 /lib/libbar.so\n");
    ws.write("in.bin", words64(&[0x1800]));

    let output = ws.translate(&src, &dst, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!ws.path("out.bin").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Number of mappings mismatch for /lib/libbar.so"), "stderr: {stderr}");
}

#[test]
fn test_reports_every_mismatch() {
    let ws = Workspace::new();
    let src = ws.write(
        "src.maps",
        "1000-2000 r--p 00000000 08:01 7 /lib/liba.so\n3000-4000 r--p 00000000 08:01 8 /lib/libb.so\n",
    );
    let dst = ws.write(
        "dst.maps",
        "8000-a000 r--p 00000000 08:01 7 /lib/liba.so\nc000-d000 r--p 00000000 08:01 9 /lib/libc.so\n",
    );
    ws.write("in.bin", words64(&[0]));

    let output = ws.translate(&src, &dst, &["--quiet"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3 problem(s)"), "stderr: {stderr}");
    assert!(stderr.contains("/lib/libb.so"));
    assert!(stderr.contains("/lib/libc.so"));
    assert!(stderr.contains("Size mismatch in /lib/liba.so"));
}

#[test]
fn test_missing_stack_is_a_warning() {
    let ws = Workspace::new();
    let src = ws.write(
        "src.maps",
        "1000-2000 r-xp 00000000 08:01 42 /lib/libx.so\n\
         7ffd0000-7ffd1000 rw-p 00000000 00:00 0 [stack]\n",
    );
    let dst = ws.write("dst.maps", "4000-5000 r-xp 00000000 08:01 42 /lib/libx.so\n");
    ws.write("in.bin", words64(&[0x7ffd_0800, 0x1010]));

    let output = ws.translate(&src, &dst, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: File in source but not in destination: [stack]"), "stderr: {stderr}");

    let out = fs::read(ws.path("out.bin")).unwrap();
    assert_eq!(read_words64(&out), vec![0x7ffd_0800, 0x4010]);
}

#[test]
fn test_trailing_partial_word_is_copied() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "1000-2000 r-xp 00000000 08:01 42 /lib/libfoo.so.1\n");
    let dst = ws.write("dst.maps", "5000-6000 r-xp 00000000 08:01 42 /lib/libfoo.so.2\n");
    let mut payload = words64(&[0x1800]);
    payload.extend_from_slice(&[0x00, 0x18, 0x00]);
    ws.write("in.bin", &payload);

    let output = ws.translate(&src, &dst, &["--quiet"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let out = fs::read(ws.path("out.bin")).unwrap();
    assert_eq!(out.len(), payload.len());
    assert_eq!(read_words64(&out[..8]), vec![0x5800]);
    assert_eq!(&out[8..], &[0x00, 0x18, 0x00]);
}

#[test]
fn test_gdb_destination_and_32_bit_words() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "08048000-08049000 r-xp 00000000 08:01 42 /opt/app/libcore.so.3\n");
    let dst = ws.write(
        "dst.gdb",
        "process 4242\n\
         Mapped address spaces:\n\
         \n\
         \x20         Start Addr   End Addr       Size     Offset objfile\n\
         \x20         0xf7700000 0xf7701000     0x1000        0x0 r-xp   /opt/app/libcore.so.3.1\n",
    );
    let payload: Vec<u8> = [0x0804_8010u32, 0x1234, 0x0804_9000].iter().flat_map(|v| v.to_le_bytes()).collect();
    ws.write("in.bin", &payload);

    let output = ws.translate(&src, &dst, &["--dst-gdb", "--bits", "32"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let out = fs::read(ws.path("out.bin")).unwrap();
    let words: Vec<u32> = out.chunks_exact(4).map(|c| u32::from_le_bytes(c.try_into().unwrap())).collect();
    assert_eq!(words, vec![0xf770_0010, 0x1234, 0xf770_1000]);
}

#[test]
fn test_empty_layout_is_an_error() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "not a mapping\n");
    let dst = ws.write("dst.maps", "5000-6000 r-xp 00000000 08:01 42 /lib/libfoo.so\n");
    ws.write("in.bin", words64(&[0x1800]));

    let output = ws.translate(&src, &dst, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!ws.path("out.bin").exists());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No valid source mappings"), "stderr: {stderr}");
}

#[test]
fn test_missing_maps_file_names_the_path() {
    let ws = Workspace::new();
    let dst = ws.write("dst.maps", "5000-6000 r-xp 00000000 08:01 42 /lib/libfoo.so\n");
    ws.write("in.bin", words64(&[0x1800]));

    let output = ws.translate(&ws.path("nope.maps"), &dst, &[]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.maps"), "stderr: {stderr}");
}

#[test]
fn test_missing_input_fails() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "1000-2000 r-xp 00000000 08:01 42 /lib/libfoo.so\n");
    let dst = ws.write("dst.maps", "5000-6000 r-xp 00000000 08:01 42 /lib/libfoo.so\n");

    let output = ws.translate(&src, &dst, &["--quiet"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("in.bin"));
}

#[test]
fn test_bad_bits_is_a_usage_error() {
    let ws = Workspace::new();
    let src = ws.write("src.maps", "1000-2000 r-xp 00000000 08:01 42 /lib/libfoo.so\n");

    let output = ws.translate(&src, &src, &["--bits", "16"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_resized_heap_is_not_relocated() {
    let ws = Workspace::new();
    let src = ws.write(
        "src.maps",
        "1000-2000 r-xp 00000000 08:01 42 /lib/libx.so\n10000-30000 rw-p 00000000 00:00 0 [heap]\n",
    );
    let dst = ws.write(
        "dst.maps",
        "4000-5000 r-xp 00000000 08:01 42 /lib/libx.so\n90000-91000 rw-p 00000000 00:00 0 [heap]\n",
    );
    ws.write("in.bin", words64(&[0x2f000, 0x1010]));

    let output = ws.translate(&src, &dst, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning: Size mismatch in [heap]"));

    let out = fs::read(ws.path("out.bin")).unwrap();
    assert_eq!(read_words64(&out), vec![0x2f000, 0x4010]);
}
