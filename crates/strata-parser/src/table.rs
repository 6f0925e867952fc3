//! Lexical reader for `;`-delimited tables.
//!
//! Splits source text into records and cells while tracking byte spans, so
//! later stages can point diagnostics at exact cells. Cells may be quoted with
//! `"` (a doubled `""` stands for a literal quote). Lines end with `\n` or
//! `\r\n`; blank lines are skipped. Bare cells are trimmed.
//!
//! The entry point is [`read_table`], which recovers at line boundaries and
//! reports every lexical problem of the file in one pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, opt, repeat, separated, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<TableDiagnostic>>;

/// A cell's text (unquoted, bare cells trimmed) and where it was read from.
pub(crate) type Cell = Spanned<String>;

/// One non-blank line of a table.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    cells: Vec<Cell>,
    span: Span,
}

impl Record {
    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn span(&self) -> Span {
        self.span
    }

    fn is_blank(&self) -> bool {
        self.cells.len() == 1 && self.cells[0].inner().is_empty()
    }
}

/// The records of a table, header first.
#[derive(Debug, Default)]
pub(crate) struct Table {
    records: Vec<Record>,
}

impl Table {
    pub(crate) fn header(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Records after the header.
    pub(crate) fn rows(&self) -> &[Record] {
        self.records.get(1..).unwrap_or_default()
    }
}

fn at_cell_end(input: &Input<'_>) -> bool {
    input.is_empty() || input.starts_with([';', '\n']) || input.starts_with("\r\n")
}

/// Parse a quoted cell: `"..."` with `""` as an escaped quote.
///
/// Commits after the opening quote so that an unterminated cell reports E001
/// instead of being re-read as a bare cell.
fn quoted_cell(input: &mut Input<'_>) -> IResult<Cell> {
    let start = input.current_token_start();

    '"'.parse_next(input)?;

    let content = repeat(
        0..,
        alt((literal("\"\"").value('"'), none_of(['"', '\n', '\r']))),
    )
    .fold(String::new, |mut acc, ch| {
        acc.push(ch);
        acc
    });

    let text = cut_err(terminated(content, '"'))
        .context(TableDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated quoted cell",
            help: Some("add the closing `\"` before the end of the line"),
            start,
        })
        .parse_next(input)?;

    if !at_cell_end(input) {
        let error_start = input.current_token_start();
        return Err(ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            TableDiagnostic {
                code: ErrorCode::E002,
                message: "unexpected character after quoted cell",
                help: Some("separate cells with `;`"),
                start: error_start,
            },
        )));
    }

    let end = input.current_token_start();
    Ok(Spanned::new(text, Span::new(start..end)))
}

/// Parse a bare cell up to the next `;` or line ending. May be empty.
fn bare_cell(input: &mut Input<'_>) -> IResult<Cell> {
    let start = input.current_token_start();
    let raw: &str =
        take_while(0.., |c: char| !matches!(c, ';' | '\n' | '\r')).parse_next(input)?;

    let leading = raw.len() - raw.trim_start().len();
    let text = raw.trim();
    let text_start = start + leading;

    Ok(Spanned::new(
        text.to_string(),
        Span::new(text_start..text_start + text.len()),
    ))
}

fn cell(input: &mut Input<'_>) -> IResult<Cell> {
    alt((quoted_cell, bare_cell)).parse_next(input)
}

fn record(input: &mut Input<'_>) -> IResult<Record> {
    let start = input.current_token_start();
    let cells: Vec<Cell> = separated(1.., cell, ';').parse_next(input)?;
    let end = input.current_token_start();

    Ok(Record {
        cells,
        span: Span::new(start..end),
    })
}

fn line_ending<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    alt((literal("\r\n"), literal("\n"))).parse_next(input)
}

/// Consume the rest of the current line, including its line ending.
fn skip_line(input: &mut Input<'_>) {
    let _: IResult<&str> = take_while(0.., |c: char| c != '\n').parse_next(input);
    let _: IResult<Option<char>> = opt('\n').parse_next(input);
}

/// Reader that accumulates records and diagnostics.
struct TableReader {
    records: Vec<Record>,
    diagnostics: DiagnosticCollector,
    source_len: usize,
}

impl TableReader {
    fn new(source_len: usize) -> Self {
        Self {
            records: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            source_len,
        }
    }

    fn read(&mut self, mut input: Input<'_>) {
        let _: IResult<Option<char>> = opt('\u{feff}').parse_next(&mut input);

        while !input.is_empty() {
            match record(&mut input) {
                Ok(record) => {
                    if !record.is_blank() {
                        self.records.push(record);
                    }
                }
                Err(e) => {
                    let error_pos = input.current_token_start();
                    let diagnostic = self.convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);
                    skip_line(&mut input);
                    continue;
                }
            }

            if input.is_empty() {
                break;
            }

            // A record stops at `;`-free line content, so only a stray `\r` can fail here
            if line_ending(&mut input).is_err() {
                let error_pos = input.current_token_start();
                self.diagnostics.emit(
                    Diagnostic::error("unexpected carriage return")
                        .with_code(ErrorCode::E002)
                        .with_label(self.error_span(error_pos, error_pos), "stray `\\r`")
                        .with_help("end lines with `\\n` or `\\r\\n`"),
                );
                skip_line(&mut input);
            }
        }
    }

    fn finish(self) -> Result<Table, ParseError> {
        self.diagnostics.finish().map(|()| Table {
            records: self.records,
        })
    }

    /// A span from `start` to `end` that covers at least one character when
    /// the source has one there.
    fn error_span(&self, start: usize, end: usize) -> Span {
        let end = end.max(start + 1).min(self.source_len);
        Span::new(start.min(end)..end)
    }

    /// Convert a winnow error into a diagnostic.
    ///
    /// Falls back to E002 (unexpected character) when no context is attached.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<TableDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(TableDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(self.error_span(*start, error_pos), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                self.error_span(error_pos, error_pos),
                ErrorCode::E002.description(),
            )
    }
}

/// Split `source` into records and cells.
///
/// # Returns
///
/// - `Ok(table)` - Every line was read; blank lines are dropped
/// - `Err(ParseError)` - One or more lexical errors, all reported together
pub(crate) fn read_table(source: &str) -> Result<Table, ParseError> {
    let mut reader = TableReader::new(source.len());
    reader.read(LocatingSlice::new(source));
    reader.finish()
}
