//! Implementation of the 'predict' subcommand.

use crate::cli::PredictArgs;
use crate::commands::info::print_video_info;
use crate::commands::{print_json, print_warnings, select_input};
use crate::error::CliResult;
use crate::output::{print_section, print_status, print_warning};

use vidshrink_core::{CompressionRequest, Session, SizePrediction, TranscodeEngine};

/// Probes the input and prints the size estimate for the requested mode.
pub fn run_predict<E: TranscodeEngine>(
    session: &mut Session<E>,
    args: &PredictArgs,
    show_progress: bool,
) -> CliResult<Option<SizePrediction>> {
    let request = args.compression.to_request();
    request.validate()?;

    let context = select_input(session, &args.input, show_progress && !args.json)?;
    let info = context.info().clone();
    if !args.json {
        print_warnings(context);
    }

    let prediction = session.predict(&request);

    if args.json {
        let report = serde_json::json!({
            "info": &info,
            "request": &request,
            "prediction": prediction,
        });
        print_json(&report)?;
        return Ok(prediction);
    }

    print_video_info(&info);
    print_prediction(&request, prediction.as_ref());
    Ok(prediction)
}

/// Prints the "Estimate" section.
pub fn print_prediction(request: &CompressionRequest, prediction: Option<&SizePrediction>) {
    print_section("Estimate");
    print_status("Mode", request.mode.label(), false);
    match prediction {
        Some(prediction) => {
            print_status("Estimated size", &format!("{:.2} MB", prediction.predicted_mb), true);
            print_status("Change", &prediction.change.to_string(), false);
        }
        None => print_warning("No estimate available: the video's duration is unknown"),
    }
}
