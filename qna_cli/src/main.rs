use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use owo_colors::OwoColorize;
use qna_cli::Commands;
use qna_cli::EditOutput;
use qna_cli::ListOutputFormat;
use qna_cli::OutputFormat;
use qna_cli::QnaCli;
use qna_cli::UpdateArgs;
use qna_core::AnyEmptyResult;
use qna_core::AnyResult;
use qna_core::DEFAULT_MAX_FILE_SIZE;
use qna_core::ParseDiagnostic;
use qna_core::QnAFile;
use qna_core::QnASection;
use qna_core::QnASectionChanges;
use qna_core::QnaConfig;
use qna_core::Question;
use qna_core::QuestionChange;
use qna_core::add_section;
use qna_core::generate_qna_pair;
use qna_core::insert_section;
use qna_core::parse;
use qna_core::project::FileReport;
use qna_core::project::ScanOptions;
use qna_core::project::check_files;
use qna_core::project::read_file;
use qna_core::remove_section;
use qna_core::render_section;
use qna_core::update_qna_section;
use serde::Serialize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: AtomicBool = AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = QnaCli::parse();

	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::List { file, format }) => run_list(&args, file, *format),
		Some(Commands::Pair { question, answer }) => {
			println!("{}", generate_qna_pair(question, answer));
			Ok(())
		}
		Some(Commands::Add {
			file,
			questions,
			answer,
			index,
			output,
		}) => run_add(&args, file, questions, answer, *index, *output),
		Some(Commands::Remove {
			file,
			index,
			output,
		}) => run_remove(&args, file, *index, *output),
		Some(Commands::Update(update)) => run_update(&args, update),
		None => {
			eprintln!("No subcommand specified. Run `qna --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<qna_core::QnaError>() {
			Ok(qna_err) => {
				let report: miette::Report = (*qna_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `QNA_LOG` takes an `EnvFilter` directive and wins over
/// `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env("QNA_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &QnaCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_file(args: &QnaCli, file: &Path) -> PathBuf {
	if file.is_absolute() {
		file.to_path_buf()
	} else {
		resolve_root(args).join(file)
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

/// Read and parse a single file, honoring `max_file_size` from the project
/// config.
fn load_file(args: &QnaCli, file: &Path) -> AnyResult<(PathBuf, QnAFile)> {
	let root = resolve_root(args);
	let path = resolve_file(args, file);
	let limit = QnaConfig::load(&root)?.map_or(DEFAULT_MAX_FILE_SIZE, |config| config.max_file_size);
	let content = read_file(&path, limit)?;
	let parsed = parse(make_relative(&path, &root), content);

	Ok((path, parsed))
}

#[derive(Serialize)]
struct CheckOutput<'a> {
	ok: bool,
	files: Vec<FileOutput<'a>>,
}

#[derive(Serialize)]
struct FileOutput<'a> {
	file: &'a str,
	sections: usize,
	diagnostics: &'a [ParseDiagnostic],
}

fn run_check(args: &QnaCli, format: OutputFormat) -> AnyEmptyResult {
	let root = resolve_root(args);
	let config = QnaConfig::load(&root)?;
	let options = ScanOptions::from_config(config.as_ref())?;
	let reports = check_files(&root, &options)?;
	let problems: usize = reports
		.iter()
		.map(|report| report.file.diagnostics.len())
		.sum();

	if args.verbose {
		println!("Scanned {} file(s)", reports.len());
		for report in &reports {
			println!(
				"  {} ({} section(s))",
				report.file.id,
				report.file.qna_sections.len()
			);
		}
	}

	match format {
		OutputFormat::Json => {
			let output = CheckOutput {
				ok: problems == 0,
				files: reports
					.iter()
					.map(|report| {
						FileOutput {
							file: &report.file.id,
							sections: report.file.qna_sections.len(),
							diagnostics: &report.file.diagnostics,
						}
					})
					.collect(),
			};
			println!("{}", serde_json::to_string(&output)?);
		}
		OutputFormat::Github => {
			for report in &reports {
				for diagnostic in &report.file.diagnostics {
					println!(
						"::warning file={},line={},col={}::{diagnostic} ({})",
						report.file.id,
						diagnostic.line(),
						diagnostic.column(),
						diagnostic.code()
					);
				}
			}
			eprintln!("{}", check_summary(&reports, problems));
		}
		OutputFormat::Text => {
			if problems == 0 {
				println!("{}", check_summary(&reports, problems));
			} else {
				for report in &reports {
					for diagnostic in &report.file.diagnostics {
						let rendered = diagnostic_to_report(diagnostic, &report.file.id);
						eprintln!("{rendered:?}");
					}
				}
				eprintln!("{}", colored!(check_summary(&reports, problems), bold));
			}
		}
	}

	if problems > 0 {
		process::exit(1);
	}

	Ok(())
}

fn check_summary(reports: &[FileReport], problems: usize) -> String {
	if problems == 0 {
		return format!("Check passed: {} file(s), no problems found.", reports.len());
	}

	let files = reports
		.iter()
		.filter(|report| !report.file.is_clean())
		.count();

	format!("Check failed: {problems} problem(s) in {files} file(s).")
}

/// Convert a `ParseDiagnostic` into a warning `miette::Report` with its code
/// and a help text.
fn diagnostic_to_report(diagnostic: &ParseDiagnostic, file: &str) -> miette::Report {
	let location = format!("{file}:{}:{}", diagnostic.line(), diagnostic.column());
	let message = format!("[{location}] {diagnostic}");
	let help = match diagnostic {
		ParseDiagnostic::UnterminatedFence { .. } => {
			"close the answer with a line of at least as many backticks"
		}
		ParseDiagnostic::UnrecognizedHeading { .. } => {
			"question headings are written `# ? question`"
		}
		ParseDiagnostic::OrphanAnswer { .. } => "add a `# ? question` line above the answer",
		ParseDiagnostic::DuplicateAnswer { .. } => {
			"a section has a single answer; start a new section with `# ? question`"
		}
		ParseDiagnostic::MalformedDirective { .. } => "directives are written `> !# @key = value`",
		ParseDiagnostic::UnknownDirective { .. } => {
			"known keys: @kb.name, @source.urls, @qna.pair.source"
		}
		_ => "comment the line out with `>` or move it into an answer",
	};

	let value = miette::MietteDiagnostic::new(message)
		.with_code(format!("qna::{}", diagnostic.code()))
		.with_help(help)
		.with_severity(miette::Severity::Warning);
	miette::Report::new(value)
}

fn run_list(args: &QnaCli, file: &Path, format: ListOutputFormat) -> AnyEmptyResult {
	let (_, parsed) = load_file(args, file)?;

	if let ListOutputFormat::Json = format {
		println!("{}", serde_json::to_string_pretty(&parsed)?);
		return Ok(());
	}

	println!(
		"{} {} section(s), {} directive(s)",
		colored!(parsed.id, bold),
		parsed.qna_sections.len(),
		parsed.directives.len()
	);

	for directive in &parsed.directives {
		println!("  {} = {}", directive.key, directive.value);
	}

	for (index, section) in parsed.qna_sections.iter().enumerate() {
		println!();
		println!(
			"{} {}",
			colored!(format!("[{index}]"), bold),
			section.section_id
		);
		print_questions(&section.questions);
		for line in section.answer.lines() {
			println!("    {line}");
		}
	}

	for diagnostic in &parsed.diagnostics {
		eprintln!(
			"{} {}:{}:{}: {diagnostic}",
			colored!("warning:", yellow),
			parsed.id,
			diagnostic.line(),
			diagnostic.column()
		);
	}

	Ok(())
}

fn print_questions(questions: &[Question]) {
	for (index, question) in questions.iter().enumerate() {
		println!("  {index}. ? {}", question.content);
	}
}

fn run_add(
	args: &QnaCli,
	file: &Path,
	questions: &[String],
	answer: &str,
	index: Option<isize>,
	output: EditOutput,
) -> AnyEmptyResult {
	let (path, parsed) = load_file(args, file)?;
	let body = render_section(questions, answer);
	let edited = match index {
		Some(index) => insert_section(&parsed, index, &body)?,
		None => add_section(&parsed, &body),
	};

	emit_edit(&path, &parsed, &edited, output)
}

fn run_remove(args: &QnaCli, file: &Path, index: usize, output: EditOutput) -> AnyEmptyResult {
	let (path, parsed) = load_file(args, file)?;
	let section = parsed.section_at(index)?;
	let edited = remove_section(&parsed, &section.section_id);

	emit_edit(&path, &parsed, &edited, output)
}

fn run_update(args: &QnaCli, update: &UpdateArgs) -> AnyEmptyResult {
	let (path, parsed) = load_file(args, &update.file)?;
	let section = parsed.section_at(update.index)?;
	let mut changes = QnASectionChanges::default();

	for edit in &update.set_questions {
		let question = question_at(section, edit.index)?;
		changes = changes.with_question(QuestionChange::update(
			question.id.clone(),
			edit.text.clone(),
		));
	}

	for index in &update.remove_questions {
		let question = question_at(section, *index)?;
		changes = changes.with_question(QuestionChange::remove(question.id.clone()));
	}

	for text in &update.add_questions {
		changes = changes.with_question(QuestionChange::add(text.clone()));
	}

	if let Some(answer) = &update.answer {
		changes = changes.with_answer(answer.clone());
	}

	let edited = update_qna_section(&parsed, &section.section_id, &changes);

	emit_edit(&path, &parsed, &edited, update.output)
}

fn question_at(section: &QnASection, index: usize) -> AnyResult<&Question> {
	section.questions.get(index).ok_or_else(|| {
		format!(
			"section `{}` has no question at index {index} ({} question(s))",
			section.section_id,
			section.questions.len()
		)
		.into()
	})
}

/// Write, diff or print the edited document.
fn emit_edit(path: &Path, before: &QnAFile, after: &QnAFile, output: EditOutput) -> AnyEmptyResult {
	if after.diagnostics.len() > before.diagnostics.len() {
		eprintln!(
			"{} the edit leaves {} diagnostic(s) in {}",
			colored!("warning:", yellow),
			after.diagnostics.len(),
			after.id
		);
	}

	if output.write {
		tracing::debug!(path = %path.display(), bytes = after.content.len(), "writing edited file");
		std::fs::write(path, &after.content)?;
		println!("Updated {}", after.id);
	} else if output.diff {
		print_diff(&before.content, &after.content);
	} else {
		print!("{}", after.content);
	}

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("{}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("{}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!(" {change}");
			}
		}

		if change.missing_newline() {
			println!();
		}
	}
}
