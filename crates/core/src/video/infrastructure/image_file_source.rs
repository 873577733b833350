use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Decodes a list of image files as consecutive frames.
///
/// Directories are expanded to the images directly inside them, sorted by
/// path. Frame indices count every path, so an undecodable file still
/// consumes its index.
pub struct ImageFileSource {
    pending: VecDeque<PathBuf>,
    total: usize,
    next_index: usize,
}

impl ImageFileSource {
    pub fn new(inputs: &[PathBuf]) -> Result<Self, Box<dyn std::error::Error>> {
        let mut paths = Vec::new();
        for input in inputs {
            if input.is_dir() {
                paths.extend(images_in(input)?);
            } else if input.is_file() {
                paths.push(input.clone());
            } else {
                return Err(format!("Input not found: {}", input.display()).into());
            }
        }
        log::info!("Found {} image(s) to analyse", paths.len());
        Ok(Self {
            total: paths.len(),
            pending: paths.into(),
            next_index: 0,
        })
    }
}

fn images_in(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let path = self.pending.pop_front()?;
        let index = self.next_index;
        self.next_index += 1;

        log::debug!("Decoding frame {index} from {}", path.display());
        Some(
            image::open(&path)
                .map(|img| Frame::from_rgb_image(img.to_rgb8(), index))
                .map_err(|e| -> Box<dyn std::error::Error> {
                    format!("{}: {e}", path.display()).into()
                }),
        )
    }

    fn total_frames(&self) -> Option<usize> {
        Some(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(path: &Path, rgb: [u8; 3]) {
        let mut img = image::RgbImage::new(8, 6);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb(rgb);
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_directory_is_expanded_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("b.png"), [2, 2, 2]);
        write_image(&dir.path().join("a.PNG"), [1, 1, 1]);
        std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();

        let mut source = ImageFileSource::new(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(source.total_frames(), Some(2));

        let first = source.next_frame().unwrap().unwrap();
        let second = source.next_frame().unwrap().unwrap();
        assert!(source.next_frame().is_none());

        assert_eq!((first.index(), first.data()[0]), (0, 1));
        assert_eq!((second.index(), second.data()[0]), (1, 2));
        assert_eq!((first.width(), first.height(), first.channels()), (8, 6, 3));
    }

    #[test]
    fn test_explicit_files_keep_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_image(&a, [1, 1, 1]);
        write_image(&b, [2, 2, 2]);

        let mut source = ImageFileSource::new(&[b, a]).unwrap();
        assert_eq!(source.next_frame().unwrap().unwrap().data()[0], 2);
        assert_eq!(source.next_frame().unwrap().unwrap().data()[0], 1);
    }

    #[test]
    fn test_undecodable_file_yields_error_and_keeps_going() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("a.png");
        let good = dir.path().join("b.png");
        std::fs::write(&broken, b"definitely not a png").unwrap();
        write_image(&good, [9, 9, 9]);

        let mut source = ImageFileSource::new(&[dir.path().to_path_buf()]).unwrap();
        assert!(source.next_frame().unwrap().is_err());
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.index(), 1);
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let result = ImageFileSource::new(&[PathBuf::from("/nonexistent/face.png")]);
        assert!(result.is_err());
    }
}
