//! CLI commands for the Kardex report
//!
//! `report` renders one filtered report to stdout; `options` lists the
//! values each filter accepts for a file.

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::KardexResult;
use crate::loader::{DatasetCache, LoaderOptions};
use crate::reports::{
    parse_filter_date, Choice, FilterOptions, FilterSelection, KardexReport, RenderOptions,
    TriState,
};

/// Arguments of `kardex report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the Kardex CSV file
    pub file: PathBuf,

    /// Store code (NROEMPRESA)
    #[arg(short, long)]
    pub company: i64,

    /// Product sequence id (SEQPRODUTO)
    #[arg(short, long)]
    pub product: i64,

    /// Operator code (CODGERALOPER); all operators when omitted
    #[arg(short, long)]
    pub operator: Option<i64>,

    /// Location (LOCAL); all locations when omitted
    #[arg(short, long)]
    pub location: Option<String>,

    /// Start date (dd/mm/yyyy); the period filter needs both bounds
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (dd/mm/yyyy)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Managerial stock flag: yes, no or indifferent
    #[arg(long, default_value = "indifferent")]
    pub managerial: TriState,

    /// Fiscal stock flag: yes, no or indifferent
    #[arg(long, default_value = "indifferent")]
    pub fiscal: TriState,

    /// Show every source column
    #[arg(long)]
    pub all_columns: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,
}

impl ReportArgs {
    /// Build the filter selection, validating the date inputs
    pub fn selection(&self) -> KardexResult<FilterSelection> {
        let start_date = parse_filter_date(self.start.as_deref().unwrap_or(""))?;
        let end_date = parse_filter_date(self.end.as_deref().unwrap_or(""))?;

        let selection = FilterSelection {
            company_code: self.company,
            operator_code: Choice::from(self.operator),
            product_id: self.product,
            location: Choice::from(self.location.clone()),
            start_date,
            end_date,
            managerial_stock: self.managerial,
            fiscal_stock: self.fiscal,
        };
        selection.validate()?;
        Ok(selection)
    }
}

/// Arguments of `kardex options`
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Path to the Kardex CSV file
    pub file: PathBuf,
}

/// Render the report described by the arguments
pub fn render_report(settings: &Settings, args: &ReportArgs) -> KardexResult<String> {
    // Validate user input before touching the file
    let selection = args.selection()?;

    let mut cache = DatasetCache::new(LoaderOptions::from(settings));
    let dataset = cache.load_path(&args.file)?;
    let report = KardexReport::generate(&dataset, selection)?;

    let options = RenderOptions {
        color: !args.no_color,
        all_columns: args.all_columns,
        decimal_places: settings.decimal_places,
    };
    Ok(report.format_terminal(&options))
}

/// Handle `kardex report`
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> KardexResult<()> {
    let output = render_report(settings, &args)?;
    print!("{}", output);
    Ok(())
}

/// Render the selectable filter values of a file
pub fn render_options(settings: &Settings, args: &OptionsArgs) -> KardexResult<String> {
    let mut cache = DatasetCache::new(LoaderOptions::from(settings));
    let dataset = cache.load_path(&args.file)?;
    let options = FilterOptions::from_dataset(&dataset);

    let join = |values: Vec<String>| {
        if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        }
    };
    let numbers = |values: &[i64]| join(values.iter().map(|v| v.to_string()).collect());

    let mut output = String::new();
    output.push_str(&format!(
        "{}: {} row(s)\n",
        args.file.display(),
        dataset.len()
    ));
    let stats = dataset.stats();
    if stats.recovered_cells() > 0 {
        output.push_str(&format!(
            "Recovered {} unparseable cell(s) as missing\n",
            stats.recovered_cells()
        ));
    }
    output.push('\n');
    output.push_str(&format!("Stores:    {}\n", numbers(&options.companies)));
    output.push_str(&format!("Products:  {}\n", numbers(&options.products)));
    output.push_str(&format!("Operators: All, {}\n", numbers(&options.operators)));
    output.push_str(&format!(
        "Locations: All, {}\n",
        join(options.locations.clone())
    ));
    Ok(output)
}

/// Handle `kardex options`
pub fn handle_options_command(settings: &Settings, args: OptionsArgs) -> KardexResult<()> {
    let output = render_options(settings, &args)?;
    print!("{}", output);
    Ok(())
}
