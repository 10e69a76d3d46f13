//! Re-printing observations in display units

use crate::config::{DistanceUnit, PipelineConfig, TemperatureUnit};
use crate::grammar::ObservationCodec;
use crate::pipeline::convert_reader;

const INPUT: &[u8] = b"2020-01-01T00:00|10,20|300|GB
not a record
2020-01-01T00:01|0,0|10|AU
2020-01-01T00:02|5000,0|273|FR
";

async fn convert(distance: DistanceUnit, temperature: TemperatureUnit) -> (String, u64) {
    let codec = ObservationCodec::display(distance, temperature);
    let mut output = Vec::new();
    let stats = convert_reader(INPUT, &mut output, &codec, &PipelineConfig::default())
        .await
        .unwrap();
    (String::from_utf8(output).unwrap(), stats.rejected)
}

#[tokio::test]
async fn test_convert_to_normalised_units() {
    let (output, rejected) = convert(DistanceUnit::Kilometres, TemperatureUnit::Kelvin).await;
    assert_eq!(
        output,
        "2020-01-01T00:00|10,20|300|GB\n\
         2020-01-01T00:01|0,0|283|AU\n\
         2020-01-01T00:02|5,0|273|FR\n"
    );
    assert_eq!(rejected, 1);
}

#[tokio::test]
async fn test_convert_to_imperial_units() {
    let (output, _) = convert(DistanceUnit::Miles, TemperatureUnit::Fahrenheit).await;
    assert_eq!(
        output,
        "2020-01-01T00:00|6,12|80|GB\n\
         2020-01-01T00:01|0,0|50|AU\n\
         2020-01-01T00:02|3,0|32|FR\n"
    );
}

#[tokio::test]
async fn test_converted_output_reparses_with_same_codec() {
    let (output, _) = convert(DistanceUnit::Metres, TemperatureUnit::Celsius).await;
    let codec = ObservationCodec::display(DistanceUnit::Metres, TemperatureUnit::Celsius);

    for line in output.lines() {
        let observation = codec.parse_line(line).unwrap();
        assert_eq!(codec.print_line(&observation).as_deref(), Some(line));
    }
}
