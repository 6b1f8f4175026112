use std::collections::BTreeMap;
use std::fs;

use grabit_core::{OutputFlags, OutputFormat};
use grabit_engine::{ImageFile, OutputWriter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const URL: &str = "https://www.example.com/articles/42";

fn outputs_of(pairs: &[(OutputFormat, &str)]) -> BTreeMap<OutputFormat, String> {
    pairs
        .iter()
        .map(|(format, content)| (*format, content.to_string()))
        .collect()
}

#[test]
fn writes_one_file_per_format_in_the_domain_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let outputs = outputs_of(&[
        (OutputFormat::Md, "# markdown\n"),
        (OutputFormat::ReadableHtml, "<article>hi</article>"),
        (OutputFormat::RawHtml, "<html>raw</html>"),
    ]);

    writer
        .write("My Article", &outputs, URL, OutputFlags::default(), &[])
        .unwrap();

    let dir = tmp.path().join("example.com");
    assert_eq!(
        fs::read_to_string(dir.join("My Article.md")).unwrap(),
        "# markdown\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("My Article.html")).unwrap(),
        "<article>hi</article>"
    );
    assert_eq!(
        fs::read_to_string(dir.join("My Article.raw.html")).unwrap(),
        "<html>raw</html>"
    );
}

#[test]
fn domain_subdirectory_can_be_disabled() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let outputs = outputs_of(&[(OutputFormat::Md, "body\n")]);
    let flags = OutputFlags {
        create_domain_subdir: false,
        overwrite: false,
    };

    writer.write("Title", &outputs, URL, flags, &[]).unwrap();

    assert!(tmp.path().join("Title.md").is_file());
    assert!(!tmp.path().join("example.com").exists());
}

#[test]
fn filename_is_sanitized_before_writing() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let outputs = outputs_of(&[(OutputFormat::Md, "body\n")]);
    let flags = OutputFlags {
        create_domain_subdir: false,
        overwrite: false,
    };

    writer
        .write("invalid|file:name", &outputs, URL, flags, &[])
        .unwrap();

    assert!(tmp.path().join("invalidfilename.md").is_file());
}

#[test]
fn existing_files_are_kept_unless_overwrite_is_set() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let flags = OutputFlags {
        create_domain_subdir: false,
        overwrite: false,
    };
    let path = tmp.path().join("Title.md");
    fs::write(&path, "original").unwrap();

    let outputs = outputs_of(&[(OutputFormat::Md, "replacement\n")]);
    writer.write("Title", &outputs, URL, flags, &[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "original");

    let overwriting = OutputFlags {
        create_domain_subdir: false,
        overwrite: true,
    };
    writer.write("Title", &outputs, URL, overwriting, &[]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "replacement\n");
}

#[test]
fn images_land_in_the_images_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let outputs = outputs_of(&[(OutputFormat::Md, "body\n")]);
    let images = vec![
        ImageFile {
            filename: "photo.jpg".to_string(),
            bytes: b"jpeg-bytes".to_vec(),
        },
        ImageFile {
            filename: "photo_1.jpg".to_string(),
            bytes: b"other-bytes".to_vec(),
        },
    ];

    writer
        .write("Title", &outputs, URL, OutputFlags::default(), &images)
        .unwrap();

    let images_dir = tmp.path().join("example.com").join("images");
    assert_eq!(fs::read(images_dir.join("photo.jpg")).unwrap(), b"jpeg-bytes");
    assert_eq!(
        fs::read(images_dir.join("photo_1.jpg")).unwrap(),
        b"other-bytes"
    );
}

#[test]
fn existing_images_are_kept_unless_overwrite_is_set() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let flags = OutputFlags {
        create_domain_subdir: false,
        overwrite: false,
    };
    let images_dir = tmp.path().join("images");
    fs::create_dir_all(&images_dir).unwrap();
    fs::write(images_dir.join("photo.jpg"), "original").unwrap();

    let outputs = outputs_of(&[(OutputFormat::Md, "body\n")]);
    let images = vec![ImageFile {
        filename: "photo.jpg".to_string(),
        bytes: b"replacement".to_vec(),
    }];
    writer.write("Title", &outputs, URL, flags, &images).unwrap();

    assert_eq!(fs::read(images_dir.join("photo.jpg")).unwrap(), b"original");
}

#[test]
fn stdout_only_results_touch_no_files() {
    let tmp = TempDir::new().unwrap();
    let writer = OutputWriter::new(tmp.path());
    let outputs = outputs_of(&[(OutputFormat::StdoutMd, "printed\n")]);
    let images = vec![ImageFile {
        filename: "photo.jpg".to_string(),
        bytes: b"jpeg-bytes".to_vec(),
    }];

    writer
        .write("Title", &outputs, URL, OutputFlags::default(), &images)
        .unwrap();

    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}
