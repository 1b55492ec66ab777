//! Line format of the metadata log.
//!
//! One record per newline-terminated line, six comma-separated fields in a
//! fixed order. Integers are plain decimal; strings are raw and must not
//! contain the delimiter or line breaks (see [`sanitize_field`]).

use crate::types::ImageRecord;

pub const DELIMITER: char = ',';

pub const FIELDS: [&str; 6] = [
    "filename",
    "processed_image_path",
    "colormap_image_path",
    "width",
    "height",
    "depth",
];

/// The header line, without terminator.
pub fn header() -> String {
    FIELDS.join(",")
}

/// True if `line` is the header (trailing `\r` tolerated).
pub fn is_header(line: &str) -> bool {
    line.trim_end_matches('\r') == header()
}

/// Serialize a record as one newline-terminated line.
pub fn encode(record: &ImageRecord) -> String {
    format!(
        "{},{},{},{},{},{}\n",
        record.filename,
        record.processed_path,
        record.colormap_path,
        record.width,
        record.height,
        record.depth
    )
}

/// Parse one line (terminator already stripped).
pub fn decode(line: &str) -> Result<ImageRecord, String> {
    let line = line.trim_end_matches('\r');
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELDS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS.len(),
            fields.len()
        ));
    }

    let number = |index: usize| -> Result<i64, String> {
        fields[index]
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("{}: {}", FIELDS[index], e))
    };
    let dimension = |index: usize| -> Result<u32, String> {
        u32::try_from(number(index)?).map_err(|e| format!("{}: {}", FIELDS[index], e))
    };

    Ok(ImageRecord {
        filename: fields[0].to_string(),
        processed_path: fields[1].to_string(),
        colormap_path: fields[2].to_string(),
        width: dimension(3)?,
        height: dimension(4)?,
        depth: number(5)?,
    })
}

/// Replace characters the format cannot carry.
pub fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            DELIMITER | '\n' | '\r' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ImageRecord {
        ImageRecord {
            filename: "leaf.jpg".into(),
            processed_path: "resized_images/leaf_processed.jpg".into(),
            colormap_path: "resized_images/leaf_colormap.jpg".into(),
            width: 150,
            height: 110,
            depth: -7,
        }
    }

    #[test]
    fn test_header_field_order() {
        assert_eq!(
            header(),
            "filename,processed_image_path,colormap_image_path,width,height,depth"
        );
        assert!(is_header(&header()));
        assert!(is_header(&format!("{}\r", header())));
    }

    #[test]
    fn test_encode_layout() {
        assert_eq!(
            encode(&sample()),
            "leaf.jpg,resized_images/leaf_processed.jpg,resized_images/leaf_colormap.jpg,150,110,-7\n"
        );
    }

    #[test]
    fn test_decode_encoded_line() {
        let line = encode(&sample());
        assert_eq!(decode(line.trim_end_matches('\n')).unwrap(), sample());
    }

    #[test]
    fn test_decode_crlf_line() {
        let record = decode("a.png,p.png,c.png,1,2,3\r").unwrap();
        assert_eq!(record.depth, 3);
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        let err = decode("a.png,p.png,150,110").unwrap_err();
        assert!(err.contains("expected 6 fields"));
    }

    #[test]
    fn test_decode_rejects_non_numeric_depth() {
        let err = decode("a.png,p.png,c.png,150,110,deep").unwrap_err();
        assert!(err.contains("depth"));
    }

    #[test]
    fn test_decode_rejects_negative_width() {
        let err = decode("a.png,p.png,c.png,-150,110,1").unwrap_err();
        assert!(err.contains("width"));
    }

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("a,b\nc\rd.jpg"), "a_b_c_d.jpg");
        assert_eq!(sanitize_field("plain.png"), "plain.png");
    }
}
