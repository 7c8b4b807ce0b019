use std::path::Path;

use serde::Serialize;

use crate::MintError;

/// One row of NFT metadata, matching the wallet's `nft_mint_bulk` entries.
/// Values are carried as strings and passed through to the wallet verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintRecord {
    pub hash: String,
    pub uris: Vec<String>,
    pub meta_hash: String,
    pub meta_uris: Vec<String>,
    pub license_hash: String,
    pub license_uris: Vec<String>,
    pub edition_number: u64,
    pub edition_total: u64,
}

const DEFAULT_COLUMNS: [&str; 8] = [
    "hash",
    "uris",
    "meta_hash",
    "meta_uris",
    "license_hash",
    "license_uris",
    "edition_number",
    "edition_total",
];

/// Splits `items` into contiguous chunks of `chunk_size`, preserving order.
/// The final chunk may be shorter. Fails only when `chunk_size` is zero.
pub fn partition<T>(items: &[T], chunk_size: usize) -> Result<Vec<&[T]>, MintError> {
    if chunk_size == 0 {
        return Err(MintError::InvalidChunkSize);
    }

    Ok(items.chunks(chunk_size).collect())
}

/// Reads NFT metadata rows from a csv file.
///
/// Repeatable columns (`uris`, `meta_uris`, `license_uris`) are collapsed
/// into ordered lists. A trailing `target` column, when present, is split
/// out into its own list of per-row destination addresses. Files without a
/// header row use the fixed default column order.
pub fn read_metadata_csv(
    path: impl AsRef<Path>,
    has_header: bool,
    has_targets: bool,
) -> Result<(Vec<MintRecord>, Vec<String>), MintError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();

    for row in reader.records() {
        rows.push(row?);
    }

    let (header, rows) = if has_header {
        let header = rows
            .first()
            .ok_or_else(|| MintError::Metadata {
                row: 0,
                message: "missing header row".to_string(),
            })?
            .iter()
            .map(|column| column.trim().to_string())
            .collect::<Vec<String>>();
        (header, &rows[1..])
    } else {
        let mut header = DEFAULT_COLUMNS.map(str::to_string).to_vec();
        if has_targets {
            header.push("target".to_string());
        }
        (header, &rows[..])
    };

    let mut records = Vec::new();
    let mut targets = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let mut builder = RecordBuilder::default();

        for (column, value) in header.iter().zip(row.iter()) {
            builder.set(index, column, value, &mut targets)?;
        }

        records.push(builder.finish(index)?);
    }

    Ok((records, targets))
}

#[derive(Debug, Default)]
struct RecordBuilder {
    hash: Option<String>,
    uris: Vec<String>,
    meta_hash: Option<String>,
    meta_uris: Vec<String>,
    license_hash: Option<String>,
    license_uris: Vec<String>,
    edition_number: Option<u64>,
    edition_total: Option<u64>,
}

impl RecordBuilder {
    fn set(
        &mut self,
        row: usize,
        column: &str,
        value: &str,
        targets: &mut Vec<String>,
    ) -> Result<(), MintError> {
        match column {
            "hash" => self.hash = Some(value.to_string()),
            "uris" => self.uris.push(value.to_string()),
            "meta_hash" => self.meta_hash = Some(value.to_string()),
            "meta_uris" => self.meta_uris.push(value.to_string()),
            "license_hash" => self.license_hash = Some(value.to_string()),
            "license_uris" => self.license_uris.push(value.to_string()),
            "edition_number" => self.edition_number = Some(parse_number(row, column, value)?),
            "edition_total" => self.edition_total = Some(parse_number(row, column, value)?),
            "target" => targets.push(value.to_string()),
            _ => {
                return Err(MintError::Metadata {
                    row,
                    message: format!("unrecognized column {column}"),
                })
            }
        }

        Ok(())
    }

    fn finish(self, row: usize) -> Result<MintRecord, MintError> {
        Ok(MintRecord {
            hash: self.hash.ok_or_else(|| MintError::Metadata {
                row,
                message: "missing hash column".to_string(),
            })?,
            uris: self.uris,
            meta_hash: self.meta_hash.unwrap_or_default(),
            meta_uris: self.meta_uris,
            license_hash: self.license_hash.unwrap_or_default(),
            license_uris: self.license_uris,
            edition_number: self.edition_number.unwrap_or(1),
            edition_total: self.edition_total.unwrap_or(1),
        })
    }
}

fn parse_number(row: usize, column: &str, value: &str) -> Result<u64, MintError> {
    value.trim().parse().map_err(|_| MintError::Metadata {
        row,
        message: format!("invalid {column} value {value}"),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chianft-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_partition_sizes() {
        let items = (0..100).collect::<Vec<i32>>();

        let chunks = partition(&items, 25).unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|chunk| chunk.len() == 25));

        let chunks = partition(&items, 30).unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[3].len(), 10);

        let concatenated = chunks.concat();
        assert_eq!(concatenated, items);
    }

    #[test]
    fn test_partition_edge_cases() {
        let empty: [i32; 0] = [];
        assert!(partition(&empty, 25).unwrap().is_empty());

        let items = [1, 2, 3];
        assert!(matches!(
            partition(&items, 0),
            Err(MintError::InvalidChunkSize)
        ));

        let chunks = partition(&items, 10).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], &items);
    }

    #[test]
    fn test_read_metadata_with_header() -> anyhow::Result<()> {
        let path = write_temp_csv(
            "header.csv",
            "hash,uris,uris,meta_hash,meta_uris,license_hash,license_uris,edition_number,edition_total,target\n\
             cafe,https://one,https://two,beef,https://meta,f00d,https://license,1,2,xch1aaa\n\
             cafe2,https://three,https://four,beef2,https://meta2,f00d2,https://license2,2,2,xch1bbb\n",
        );

        let (records, targets) = read_metadata_csv(&path, true, true)?;
        fs::remove_file(&path)?;

        assert_eq!(records.len(), 2);
        assert_eq!(targets, vec!["xch1aaa", "xch1bbb"]);

        assert_eq!(
            records[0],
            MintRecord {
                hash: "cafe".to_string(),
                uris: vec!["https://one".to_string(), "https://two".to_string()],
                meta_hash: "beef".to_string(),
                meta_uris: vec!["https://meta".to_string()],
                license_hash: "f00d".to_string(),
                license_uris: vec!["https://license".to_string()],
                edition_number: 1,
                edition_total: 2,
            }
        );
        assert_eq!(records[1].edition_number, 2);

        Ok(())
    }

    #[test]
    fn test_read_metadata_without_header() -> anyhow::Result<()> {
        let path = write_temp_csv(
            "headerless.csv",
            "cafe,https://one,beef,https://meta,f00d,https://license,1,1\n",
        );

        let (records, targets) = read_metadata_csv(&path, false, false)?;
        fs::remove_file(&path)?;

        assert!(targets.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hash, "cafe");
        assert_eq!(records[0].uris, vec!["https://one"]);
        assert_eq!(records[0].license_uris, vec!["https://license"]);

        Ok(())
    }

    #[test]
    fn test_read_metadata_unrecognized_column() {
        let path = write_temp_csv("unknown.csv", "hash,mystery\ncafe,value\n");

        let result = read_metadata_csv(&path, true, false);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(MintError::Metadata { row: 0, .. })));
    }
}
