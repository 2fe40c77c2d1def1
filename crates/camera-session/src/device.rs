//! Video input discovery.

use std::path::Path;

use serde::{Deserialize, Serialize};

const SYSFS_VIDEO4LINUX: &str = "/sys/class/video4linux";

/// Which way a camera points, guessed from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Rear / world-facing.
    Environment,
    /// Front / user-facing.
    User,
    #[default]
    Unknown,
}

impl CameraFacing {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        if ["rear", "back", "environment", "world"]
            .iter()
            .any(|k| label.contains(k))
        {
            Self::Environment
        } else if ["front", "user", "facetime", "integrated", "webcam"]
            .iter()
            .any(|k| label.contains(k))
        {
            Self::User
        } else {
            Self::Unknown
        }
    }
}

/// One enumerated video input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device node, e.g. `/dev/video0`.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    pub facing: CameraFacing,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            facing: CameraFacing::from_label(&label),
            label,
        }
    }
}

/// List capture-capable `/dev/video*` nodes, labelled from sysfs.
pub fn list_video_inputs() -> Vec<DeviceDescriptor> {
    scan_video_inputs(Path::new("/dev"), Path::new(SYSFS_VIDEO4LINUX))
}

/// Scan `dev_dir` for `videoN` nodes in index order.
///
/// Nodes whose sysfs `index` is not 0 are metadata companions of another
/// node and are skipped.
pub fn scan_video_inputs(dev_dir: &Path, sysfs_dir: &Path) -> Vec<DeviceDescriptor> {
    let Ok(entries) = std::fs::read_dir(dev_dir) else {
        return Vec::new();
    };

    let mut nodes: Vec<(u32, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let index = name.strip_prefix("video")?.parse::<u32>().ok()?;
            Some((index, name))
        })
        .collect();
    nodes.sort();

    nodes
        .into_iter()
        .filter(|(_, name)| {
            read_trimmed(&sysfs_dir.join(name).join("index")).map_or(true, |i| i == "0")
        })
        .map(|(_, name)| {
            let label =
                read_trimmed(&sysfs_dir.join(&name).join("name")).unwrap_or_else(|| name.clone());
            DeviceDescriptor::new(dev_dir.join(&name).to_string_lossy(), label)
        })
        .collect()
}

fn read_trimmed(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_from_label() {
        assert_eq!(CameraFacing::from_label("Rear Camera"), CameraFacing::Environment);
        assert_eq!(
            CameraFacing::from_label("Integrated Camera: Integrated C"),
            CameraFacing::User
        );
        assert_eq!(CameraFacing::from_label("USB2.0 HD UVC"), CameraFacing::Unknown);
    }

    #[test]
    fn test_scan_skips_metadata_nodes_and_sorts() {
        let dev = tempfile::tempdir().unwrap();
        let sys = tempfile::tempdir().unwrap();

        for (node, name, index) in [
            ("video10", "Back Camera", "0"),
            ("video0", "Integrated Webcam", "0"),
            ("video1", "Integrated Webcam", "1"),
        ] {
            std::fs::write(dev.path().join(node), b"").unwrap();
            let dir = sys.path().join(node);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("name"), format!("{name}\n")).unwrap();
            std::fs::write(dir.join("index"), format!("{index}\n")).unwrap();
        }
        std::fs::write(dev.path().join("vhci"), b"").unwrap();
        std::fs::write(dev.path().join("video2"), b"").unwrap();

        let devices = scan_video_inputs(dev.path(), sys.path());
        let labels: Vec<_> = devices.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Integrated Webcam", "video2", "Back Camera"]);
        assert!(devices[0].id.ends_with("video0"));
        assert_eq!(devices[2].facing, CameraFacing::Environment);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let devices = scan_video_inputs(
            Path::new("/nonexistent/framecam/dev"),
            Path::new("/nonexistent/framecam/sys"),
        );
        assert!(devices.is_empty());
    }
}
