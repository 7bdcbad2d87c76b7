use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradecalcd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env_remove("GRADECALCD_BACKEND_URL")
        .spawn()
        .expect("spawn gradecalcd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

#[test]
fn live_summary_tracks_edits_and_derived_columns() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let opened = request(&mut stdin, &mut reader, "1", "session.open", json!({}));
    let result = &opened["result"];
    assert_eq!(result["subjects"].as_array().expect("subjects").len(), 1);
    assert_eq!(result["gpa"], json!(0.0));
    let first_id = result["subjects"][0]["id"].as_str().expect("id").to_string();

    // 20 + 20 + 55 = 95 -> grade point 10, letter A+.
    let updated = request(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.update",
        json!({
            "subjectId": first_id,
            "patch": { "name": "Math", "fa1": 20, "fa2": 20, "sa": 55 }
        }),
    );
    let row = &updated["result"]["subjects"][0];
    assert_eq!(row["total"], json!(95.0));
    assert_eq!(row["gradePoint"], json!(10));
    assert_eq!(row["letterGrade"], json!("A+"));
    assert_eq!(updated["result"]["gpa"], json!(10.0));

    // Second subject at 10 + 15 + 30 = 55 -> grade point 6; GPA (10+6)/2.
    let added = request(&mut stdin, &mut reader, "3", "subjects.add", json!({}));
    let second_id = added["result"]["subjectId"].as_str().expect("id").to_string();
    let updated = request(
        &mut stdin,
        &mut reader,
        "4",
        "subjects.update",
        json!({
            "subjectId": second_id,
            "patch": { "name": "Science", "fa1": 10, "fa2": 15, "sa": 30 }
        }),
    );
    assert_eq!(updated["result"]["subjects"][1]["gradePoint"], json!(6));
    assert_eq!(updated["result"]["subjects"][1]["letterGrade"], json!("C"));
    assert_eq!(updated["result"]["gpa"], json!(8.0));

    let summary = request(&mut stdin, &mut reader, "5", "grades.summary", json!({}));
    assert_eq!(summary["result"]["gpa"], json!(8.0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn out_of_range_scores_are_clamped_at_entry() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let opened = request(&mut stdin, &mut reader, "1", "session.open", json!({}));
    let id = opened["result"]["subjects"][0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let updated = request(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.update",
        json!({
            "subjectId": id,
            "patch": { "fa1": 99, "fa2": -4, "sa": 75.5 }
        }),
    );
    let row = &updated["result"]["subjects"][0];
    assert_eq!(row["fa1"], json!(20.0));
    assert_eq!(row["fa2"], json!(0.0));
    assert_eq!(row["sa"], json!(60.0));
    assert_eq!(row["total"], json!(80.0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn removing_the_last_subject_is_refused_over_ipc() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let opened = request(&mut stdin, &mut reader, "1", "session.open", json!({}));
    let id = opened["result"]["subjects"][0]["id"]
        .as_str()
        .expect("id")
        .to_string();

    let refused = request(
        &mut stdin,
        &mut reader,
        "2",
        "subjects.remove",
        json!({ "subjectId": id }),
    );
    assert_eq!(refused["ok"], json!(false));
    assert_eq!(refused["error"]["code"], json!("cannot_remove_last"));

    // The row survives the refusal.
    let after = request(&mut stdin, &mut reader, "3", "session.open", json!({}));
    assert_eq!(after["result"]["subjects"].as_array().expect("subjects").len(), 1);
    assert_eq!(after["result"]["subjects"][0]["id"], json!(id));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn reset_returns_to_a_single_blank_subject() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "session.setStudentName",
        json!({ "name": "Jane Doe" }),
    );
    let _ = request(&mut stdin, &mut reader, "2", "subjects.add", json!({}));
    let _ = request(&mut stdin, &mut reader, "3", "subjects.add", json!({}));

    let reset = request(&mut stdin, &mut reader, "4", "session.reset", json!({}));
    let result = &reset["result"];
    assert_eq!(result["studentName"], json!(""));
    assert_eq!(result["subjects"].as_array().expect("subjects").len(), 1);
    assert_eq!(result["gpa"], json!(0.0));

    drop(stdin);
    let _ = child.wait();
}
