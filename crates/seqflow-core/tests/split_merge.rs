use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use seqflow_core::constants::REP_TECH_GROUP_METADATA;
use seqflow_core::{merge_data, split_data, Data, DataFile, DataFormat, MergeKey, MergeOptions, MergeSource, Merger, OutputPort,
                   PortData, SplitTarget, Splitter, TaskError};
use tempfile::tempdir;

/// Una parte cada `lines` líneas.
struct LineSplitter {
    lines: usize,
}

impl Splitter for LineSplitter {
    fn split(&self, input: &DataFile, parts: &mut SplitTarget<'_>) -> Result<(), TaskError> {
        let mut writer = None;
        for (i, line) in input.open()?.lines().enumerate() {
            if i % self.lines == 0 {
                writer = Some(parts.next_part()?.create()?);
            }
            if let Some(w) = writer.as_mut() {
                writeln!(w, "{}", line?)?;
            }
        }
        Ok(())
    }
}

#[derive(Default)]
struct Concat {
    calls: Arc<AtomicUsize>,
}

impl Merger for Concat {
    fn merge(&self, parts: &mut MergeSource, output: &DataFile) -> Result<(), TaskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = output.create()?;
        for part in parts {
            out.write_all(&fs::read(part.path())?)?;
        }
        out.flush()?;
        Ok(())
    }
}

fn text_format() -> DataFormat { DataFormat::builder("text", "text", ".txt").build().unwrap() }

fn output_port(format: &DataFormat, step: &str, dir: &Path) -> PortData {
    PortData::for_output(&OutputPort::new("output", format).unwrap().with_list(true), step, dir)
}

fn write_lines(path: &Path, count: usize, tag: &str) -> String {
    let content: String = (0..count).map(|i| format!("{tag} line {i}\n")).collect();
    fs::write(path, &content).unwrap();
    content
}

#[test]
fn split_then_merge_recovers_the_original() {
    for n in [1usize, 2, 5] {
        let dir = tempdir().unwrap();
        let format = text_format();
        let source = dir.path().join("input.txt");
        let original = write_lines(&source, n * 3, "s1");
        let input = Data::from_files("s1", &format, None, vec![DataFile::new(&source)]);

        let mut parts = output_port(&format, "split", dir.path());
        let count = split_data(&LineSplitter { lines: 3 }, &input, &mut parts).unwrap();
        assert_eq!(count as usize, n);
        assert_eq!(parts.len(), n);
        assert!(parts.elements().iter().enumerate().all(|(i, d)| d.name() == "s1" && d.part() == Some(i as u32)));

        let mut merged = output_port(&format, "merge", dir.path());
        let merger = Concat::default();
        let groups = merge_data(&merger, parts.elements(), &mut merged, &MergeOptions::default()).unwrap();
        assert_eq!(groups, 1);

        let result = merged.single().unwrap().data_file().unwrap();
        assert_eq!(result.path(), dir.path().join("merge_output_text_s1.txt"));
        assert_eq!(fs::read_to_string(result.path()).unwrap(), original, "n = {n}");
    }
}

#[test]
fn merge_sorts_parts_before_reading() {
    let dir = tempdir().unwrap();
    let format = text_format();
    let mut shuffled = Vec::new();
    for part in [2u32, 0, 1] {
        let path = dir.path().join(format!("p{part}.txt"));
        fs::write(&path, format!("{part}\n")).unwrap();
        shuffled.push(Data::from_files("s1", &format, Some(part), vec![DataFile::new(&path)]));
    }
    let mut merged = output_port(&format, "merge", dir.path());
    merge_data(&Concat::default(), &shuffled, &mut merged, &MergeOptions::default()).unwrap();
    let out = merged.single().unwrap().data_file().unwrap();
    assert_eq!(fs::read_to_string(out.path()).unwrap(), "0\n1\n2\n");
}

#[test]
fn multi_file_positions_share_part_numbers() {
    let dir = tempdir().unwrap();
    let format = DataFormat::builder("paired", "pair", ".fq").max_files_count(2).build().unwrap();
    let r1 = dir.path().join("r1.fq");
    let r2 = dir.path().join("r2.fq");
    write_lines(&r1, 4, "r1");
    write_lines(&r2, 4, "r2");
    let input = Data::from_files("s1", &format, None, vec![DataFile::new(&r1), DataFile::new(&r2)]);

    let mut parts = output_port(&format, "split", dir.path());
    assert_eq!(split_data(&LineSplitter { lines: 2 }, &input, &mut parts).unwrap(), 2);
    assert_eq!(parts.len(), 2);
    for part in 0..2 {
        for file in 0..2 {
            let expected = dir.path().join(format!("split_output_pair_s1_file{file}_part{part}.fq"));
            assert!(expected.is_file(), "{} missing", expected.display());
        }
    }
    let second = fs::read_to_string(dir.path().join("split_output_pair_s1_file1_part1.fq")).unwrap();
    assert_eq!(second, "r2 line 2\nr2 line 3\n");
}

#[test]
fn split_data_cannot_be_split_again() {
    let dir = tempdir().unwrap();
    let format = text_format();
    let path = dir.path().join("x.txt");
    write_lines(&path, 2, "x");
    let part = Data::from_files("s1", &format, Some(0), vec![DataFile::new(&path)]);
    let mut out = output_port(&format, "split", dir.path());
    let err = split_data(&LineSplitter { lines: 1 }, &part, &mut out).unwrap_err();
    assert!(matches!(err, TaskError::AlreadySplit { part: 0, .. }));
}

#[test]
fn duplicate_parts_are_rejected_before_any_io() {
    let dir = tempdir().unwrap();
    let format = text_format();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    write_lines(&a, 1, "a");
    write_lines(&b, 1, "b");
    let inputs = vec![Data::from_files("s1", &format, Some(3), vec![DataFile::new(&a)]),
                      Data::from_files("s1", &format, Some(3), vec![DataFile::new(&b)])];

    let merger = Concat::default();
    let mut out = output_port(&format, "merge", dir.path());
    let err = merge_data(&merger, &inputs, &mut out, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, TaskError::DuplicatePart { part: 3, .. }));
    assert_eq!(merger.calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("merge_output_text_s1.txt").exists());
}

#[test]
fn technical_replicates_merge_by_group() {
    let dir = tempdir().unwrap();
    let format = text_format();
    let mut inputs = Vec::new();
    for (name, group) in [("rep1", "g1"), ("rep2", "g1"), ("rep3", "g2")] {
        let path = dir.path().join(format!("{name}.txt"));
        write_lines(&path, 1, name);
        let mut data = Data::from_files(name, &format, None, vec![DataFile::new(&path)]);
        data.metadata_mut().set(REP_TECH_GROUP_METADATA, group);
        inputs.push(data);
    }
    let options = MergeOptions { key: MergeKey::Metadata(REP_TECH_GROUP_METADATA.to_string()), check_duplicate_parts: false };
    let mut out = output_port(&format, "merge", dir.path());
    assert_eq!(merge_data(&Concat::default(), &inputs, &mut out, &options).unwrap(), 2);
    let g1 = fs::read_to_string(dir.path().join("merge_output_text_g1.txt")).unwrap();
    assert_eq!(g1, "rep1 line 0\nrep2 line 0\n");
    assert_eq!(out.elements()[0].metadata().get(REP_TECH_GROUP_METADATA), Some("g1"));
}

#[test]
fn colliding_merge_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let format = text_format();
    let mut inputs = Vec::new();
    for (name, group) in [("a", "grp-1"), ("b", "grp1")] {
        let path = dir.path().join(format!("{name}.txt"));
        write_lines(&path, 1, name);
        let mut data = Data::from_files(name, &format, None, vec![DataFile::new(&path)]);
        data.metadata_mut().set(REP_TECH_GROUP_METADATA, group);
        inputs.push(data);
    }
    let options = MergeOptions { key: MergeKey::Metadata(REP_TECH_GROUP_METADATA.to_string()), check_duplicate_parts: false };
    let merger = Concat::default();
    let mut out = output_port(&format, "merge", dir.path());
    let err = merge_data(&merger, &inputs, &mut out, &options).unwrap_err();
    assert!(matches!(err, TaskError::MergerKeyCollision { ref name, .. } if name == "grp1"));
    assert_eq!(merger.calls.load(Ordering::SeqCst), 0);
}
