use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use log::debug;
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::models::StudentRecord;

/// Header row of the students file, in the order rows are written.
pub const HEADER: [&str; 3] = ["name", "email", "password"];

/// Parse the students file. A missing or zero-byte file is an empty table.
///
/// Columns are matched by header name, so hand-edited files may reorder them.
/// Any row that does not fit (wrong width, blank field, unknown column) fails
/// the whole load: the next save rewrites the file wholesale, so skipping a
/// row here would delete it from disk.
pub fn read_students(path: &Path) -> StoreResult<Vec<StudentRecord>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers().map_err(row_error)?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    check_header(&headers)?;

    let mut students = Vec::new();
    for result in reader.records() {
        let row = result.map_err(row_error)?;
        let line = row.position().map_or(0, |pos| pos.line());
        let student: StudentRecord =
            row.deserialize(Some(&headers))
                .map_err(|err| StoreError::MalformedRow {
                    line,
                    reason: err.to_string(),
                })?;
        if let Some(field) = student.first_blank_field() {
            return Err(StoreError::MalformedRow {
                line,
                reason: format!("{field} is empty"),
            });
        }
        students.push(student);
    }

    Ok(students)
}

/// Replace the students file with `students`. Rows go to a temp file next to
/// the target which is synced and then renamed over it, so readers see either
/// the old table or the new one.
pub fn write_students(path: &Path, students: &[StudentRecord]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(staged.as_file_mut());
        writer.write_record(HEADER)?;
        for student in students {
            writer.serialize(student)?;
        }
        writer.flush()?;
    }
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .map_err(|err| StoreError::Io(err.error))?;

    Ok(())
}

fn check_header(headers: &csv::StringRecord) -> StoreResult<()> {
    if let Some(unknown) = headers.iter().find(|column| !HEADER.contains(column)) {
        return Err(StoreError::MalformedRow {
            line: 1,
            reason: format!("unexpected column `{unknown}`"),
        });
    }
    if let Some(missing) = HEADER
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(StoreError::MalformedRow {
            line: 1,
            reason: format!("missing column `{missing}`"),
        });
    }
    if headers.len() != HEADER.len() {
        return Err(StoreError::MalformedRow {
            line: 1,
            reason: "duplicate column in header".to_string(),
        });
    }
    Ok(())
}

fn row_error(err: csv::Error) -> StoreError {
    if err.is_io_error() {
        return StoreError::Csv(err);
    }
    let line = err.position().map_or(0, |pos| pos.line());
    StoreError::MalformedRow {
        line,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn student(name: &str, email: &str, password: &str) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let students = read_students(&dir.path().join("students.csv")).unwrap();
        assert!(students.is_empty());
    }

    #[test]
    fn zero_byte_and_header_only_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        fs::write(&path, "").unwrap();
        assert!(read_students(&path).unwrap().is_empty());

        fs::write(&path, "name,email,password\n").unwrap();
        assert!(read_students(&path).unwrap().is_empty());
    }

    #[test]
    fn empty_table_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        write_students(&path, &[]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().collect::<Vec<_>>(), ["name,email,password"]);
    }

    #[test]
    fn special_characters_are_quoted_and_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        let students = vec![
            student("Smith, Jr.", "smith@x.com", "a\"b"),
            student("Zoë", "zoe@x.com", "line1\nline2"),
            student("Plain", "plain@x.com", "pw"),
        ];

        write_students(&path, &students).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"Smith, Jr.\""));
        assert!(contents.contains("\"a\"\"b\""));

        assert_eq!(read_students(&path).unwrap(), students);
    }

    #[test]
    fn columns_are_matched_by_header_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "email,password,name\nb@x.com,pw,Bob\n").unwrap();

        assert_eq!(
            read_students(&path).unwrap(),
            vec![student("Bob", "b@x.com", "pw")]
        );
    }

    #[test]
    fn short_row_is_rejected_with_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "name,email,password\nBob,b@x.com,pw\nEve,e@x.com\n").unwrap();

        let err = read_students(&path).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { line: 3, .. }), "{err}");
    }

    #[test]
    fn blank_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        fs::write(&path, "name,email,password\nBob,,pw\n").unwrap();

        match read_students(&path).unwrap_err() {
            StoreError::MalformedRow { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "email is empty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_problems_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        fs::write(&path, "name,email\nBob,b@x.com\n").unwrap();
        assert!(matches!(
            read_students(&path),
            Err(StoreError::MalformedRow { line: 1, .. })
        ));

        fs::write(&path, "name,email,password,age\nBob,b@x.com,pw,12\n").unwrap();
        assert!(matches!(
            read_students(&path),
            Err(StoreError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn rewrite_replaces_contents_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        write_students(&path, &[student("Bob", "b@x.com", "pw")]).unwrap();
        write_students(&path, &[student("Ann", "a@x.com", "pw2")]).unwrap();

        assert_eq!(
            read_students(&path).unwrap(),
            vec![student("Ann", "a@x.com", "pw2")]
        );
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, ["students.csv"]);
    }
}
