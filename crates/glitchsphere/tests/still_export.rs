use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Width and height from the IHDR chunk that follows the signature.
fn png_dimensions(path: &Path) -> (u32, u32) {
    let bytes = fs::read(path).unwrap();
    assert_eq!(bytes[..8], PNG_SIGNATURE, "not a PNG file");
    assert_eq!(&bytes[12..16], b"IHDR");
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}

fn glitchsphere(config_dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_glitchsphere"));
    command.env("GLITCHSPHERE_CONFIG_DIR", config_dir);
    command
}

#[test]
fn still_export_writes_png() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    let output = root.path().join("out/frame.png");

    let status = glitchsphere(&config_dir)
        .arg("--still-export")
        .arg(&output)
        .args(["--size", "32x32", "--still-time", "0.5"])
        .status()
        .expect("failed to run glitchsphere --still-export");

    assert!(status.success());
    assert_eq!(png_dimensions(&output), (32, 32));
}

#[test]
fn still_export_uses_config_file_size() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "size = \"24x12\"\n").unwrap();
    let output = root.path().join("frame.png");

    let status = glitchsphere(&config_dir)
        .arg("--still-export")
        .arg(&output)
        .status()
        .expect("failed to run glitchsphere with config file");

    assert!(status.success());
    assert_eq!(png_dimensions(&output), (24, 12));
}

#[test]
fn invalid_config_file_fails() {
    let root = TempDir::new().unwrap();
    let config_path = root.path().join("broken.toml");
    fs::write(&config_path, "fps = \"fast\"\n").unwrap();
    let output = root.path().join("frame.png");

    let result = glitchsphere(root.path())
        .arg("--config")
        .arg(&config_path)
        .arg("--still-export")
        .arg(&output)
        .output()
        .expect("failed to run glitchsphere with broken config");

    assert!(!result.status.success());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("broken.toml"), "stderr: {stderr}");
}

#[test]
fn sample_prints_stage_trace() {
    let root = TempDir::new().unwrap();
    let result = glitchsphere(root.path())
        .args(["sample", "--u", "0.5", "--v", "0.5", "--time", "0"])
        .output()
        .expect("failed to run glitchsphere sample");

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("gradient    0.750000"), "stdout: {stdout}");
    assert!(stdout.contains("base_color  0.500000 0.000000 0.500000"));
}

#[test]
fn oversized_still_export_fails_cleanly() {
    let root = TempDir::new().unwrap();
    let output = root.path().join("huge.png");

    let result = glitchsphere(root.path())
        .arg("--still-export")
        .arg(&output)
        .args(["--size", "100000x100000"])
        .output()
        .expect("failed to run glitchsphere with oversized export");

    assert!(!result.status.success());
    assert!(!output.exists());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("pixel limit"), "stderr: {stderr}");
}
