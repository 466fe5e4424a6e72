//! Plot out the quantizer converting a full sweep of the CV input into stairsteps, for a few different scales
//!
//! The resulting plot is written to quantizer_plot.png in the working directory.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/.

use cv_quantizer::{
    note::{Note, NoteMask},
    pitch_table::{self, AnalogCode, ADC_MAX},
    quantizer,
};
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new("quantizer_plot.png", (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Quantizer", ("sans-serif", 40))?;

    let sub_areas = root.split_evenly((2, 2));

    // the name and allowed notes for each scale to plot out
    let details = [
        ("Chromatic", NoteMask::ALL),
        (
            "Major scale",
            NoteMask::from_notes(&[Note::C, Note::D, Note::E, Note::F, Note::G, Note::A, Note::B]),
        ),
        ("Roots and fifths", NoteMask::from_notes(&[Note::C, Note::G])),
        ("Only F#", NoteMask::from_notes(&[Note::FSHARP])),
    ];

    // zoom in on the first two octaves so that the steps are visible
    let last_code = (ADC_MAX / 5) as u32;
    let max_semitones = 26f32;

    for ((name, mask), area) in details.iter().zip(sub_areas.iter()) {
        let scale = mask.scale().ok_or("scales to plot must not be empty")?;

        let mut chart = ChartBuilder::on(area)
            .caption(*name, ("sans-serif", 15).into_font())
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0u32..last_code, 0f32..max_semitones)?;

        chart
            .configure_mesh()
            .x_desc("ADC code")
            .y_desc("Semitones")
            .draw()?;

        // plot the input
        chart
            .draw_series(LineSeries::new(
                (0..last_code).map(|c| {
                    let semitones_q8 = pitch_table::semitones_q8(AnalogCode::new(c as u16));
                    (c, semitones_q8 as f32 / pitch_table::SEMITONE_Q8 as f32)
                }),
                BLUE,
            ))?
            .label("Raw input")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        // plot the quantized output
        chart
            .draw_series(LineSeries::new(
                (0..last_code).map(|c| {
                    let semitone = quantizer::quantize(scale, AnalogCode::new(c as u16));
                    (c, semitone.value() as f32)
                }),
                RED,
            ))?
            .label("Quantized output")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;

    Ok(())
}
