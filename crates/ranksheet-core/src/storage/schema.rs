// Column order mirrors the sheet layout: Timestamp, DeviceId, Name,
// Category, Shift, Email, counts, RawScore, then the three rank columns.
// raw_score is TEXT: cells can be blank or hand-edited, and the engine
// decides what counts as numeric.
pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS scores (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  timestamp TEXT NOT NULL,
  device_id TEXT,
  name TEXT NOT NULL,
  category TEXT NOT NULL,
  shift TEXT NOT NULL,
  email TEXT NOT NULL,
  attempted_questions INTEGER NOT NULL,
  correct_questions INTEGER NOT NULL,
  wrong_questions INTEGER NOT NULL,
  raw_score TEXT NOT NULL DEFAULT '',
  overall_rank INTEGER,
  shift_rank INTEGER,
  category_rank INTEGER
);

CREATE INDEX IF NOT EXISTS idx_scores_email ON scores(email);
"#;
