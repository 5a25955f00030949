use hstpix_hst::{CarriageGroup, EventBatch, EventFile, EventRecord, FileHeader};
use hstpix_io::{
    open_event_file, slice_manifests, write_slices, HstFileReader, ImageFormat, MonitorScaling,
    SliceFileWriter,
};
use hstpix_rebin::{counts_vs_time, rebin, BinSpec, Rebinner};
use std::path::Path;
use std::fs;
use tempfile::{tempdir, NamedTempFile};

fn sample_file() -> EventFile {
    let events: EventBatch = (0..500u32)
        .map(|i| {
            let tube = u8::try_from(i % 192).unwrap();
            let pixel = u8::try_from(i % 128).unwrap();
            EventRecord::new(tube, pixel, u64::from(i) * 1_000)
        })
        .collect();
    let header = FileHeader {
        detector_carriage_group: CarriageGroup::Middle,
        ..FileHeader::default()
    };
    EventFile::from_parts(header, vec![3, 77], events).unwrap()
}

#[test]
fn test_mapped_decode_matches_in_memory() {
    let original = sample_file();
    let bytes = original.to_bytes().unwrap();

    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), &bytes).unwrap();

    let reader = HstFileReader::open(file.path()).unwrap();
    assert_eq!(reader.file_size(), bytes.len());
    assert_eq!(reader.record_count().unwrap(), 500);
    assert_eq!(reader.header().unwrap().data_offset, 28);

    let mapped = open_event_file(file.path()).unwrap();
    let in_memory = EventFile::from_bytes(&bytes).unwrap();
    assert_eq!(mapped.header(), in_memory.header());
    assert_eq!(mapped.disabled_tubes(), in_memory.disabled_tubes());
    assert_eq!(mapped.events(), in_memory.events());
    assert_eq!(mapped.events(), original.events());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = open_event_file(dir.path().join("absent.hst")).unwrap_err();
    assert!(matches!(err, hstpix_io::Error::Io(_)));
}

#[test]
fn test_write_slices_per_panel() {
    let file = sample_file();
    let result = rebin(&file, &BinSpec::Count(3)).unwrap();
    let dir = tempdir().unwrap();

    let slices = result.time_slices().unwrap();

    let written = write_slices(&slices, dir.path(), "run42", None, ImageFormat::Csv).unwrap();
    assert_eq!(written.len(), 12);
    assert!(dir.path().join("run42_right_1_of_3.csv").exists());
    assert!(dir.path().join("run42_bottom_3_of_3.csv").exists());

    // Images sum back to the result total
    let mut total = 0u64;
    for path in &written {
        let content = fs::read_to_string(path).unwrap();
        total += content
            .split([',', '\n'])
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u64>().unwrap())
            .sum::<u64>();
    }
    assert_eq!(total, result.total_counts());

    // Top panel images are 128 rows of 48 columns
    let top = fs::read_to_string(dir.path().join("run42_top_1_of_3.csv")).unwrap();
    assert_eq!(top.lines().count(), 128);
    assert_eq!(top.lines().next().unwrap().split(',').count(), 48);
}

#[test]
fn test_histogram_and_summary_output() {
    let file = sample_file();
    let histogram = counts_vs_time(file.events(), 0.0, 0.01).unwrap();
    let out = NamedTempFile::new().unwrap();
    SliceFileWriter::create(out.path())
        .unwrap()
        .write_histogram_csv(&histogram)
        .unwrap();
    let content = fs::read_to_string(out.path()).unwrap();
    assert_eq!(content.lines().count(), histogram.len() + 1);

    let result = rebin(&file, &BinSpec::Count(2)).unwrap();
    let summaries: Vec<_> = result
        .time_slices()
        .unwrap()
        .iter()
        .map(hstpix_rebin::TimeSlice::summary)
        .collect();
    let json_out = NamedTempFile::new().unwrap();
    SliceFileWriter::create(json_out.path())
        .unwrap()
        .write_summaries_json(&summaries)
        .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_out.path()).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert!(value[0]["integrated_counts"]["right"].is_u64());
}

#[test]
fn test_labelled_regions_with_manifests() {
    let file = sample_file();
    // sample events run 0..0.0499 s; the later region is listed first
    let regions = [(0.03, 0.05), (0.0, 0.01)];
    let results = Rebinner::new().rebin_regions(&file, &regions).unwrap();
    let slices: Vec<_> = results.iter().map(|r| r.time_slice(0).unwrap()).collect();
    let dir = tempdir().unwrap();

    let written =
        write_slices(&slices, dir.path(), "sans7", Some("peak"), ImageFormat::Binary).unwrap();
    assert_eq!(written.len(), 8);
    assert!(dir.path().join("sans7_peak_left_1_of_2.bin").exists());
    assert!(dir.path().join("sans7_peak_top_2_of_2.bin").exists());

    let manifests = slice_manifests(
        &slices,
        file.header().detector_carriage_group,
        Path::new("sans7.nxs.ngv"),
        Some("peak"),
        Some(MonitorScaling {
            monitor: 100_000,
            count_time: 1.0,
        }),
    )
    .unwrap();
    assert_eq!(manifests[0].container, Path::new("sans7_peak_1_of_2.nxs.ngv"));
    assert_eq!(manifests[1].container, Path::new("sans7_peak_2_of_2.nxs.ngv"));
    // 100 events fall in [0, 0.01) s, 200 in [0.03, 0.05) s
    assert_eq!(manifests[0].integrated_counts.values().sum::<u64>(), 100);
    assert_eq!(manifests[1].integrated_counts.values().sum::<u64>(), 200);
    assert!(manifests[0].integrated_counts.contains_key("detector_MR"));
    assert_eq!(manifests[0].monitor, Some(1_000));

    let out = dir.path().join("sans7_peak_manifest.json");
    SliceFileWriter::create(&out)
        .unwrap()
        .write_manifests_json(&manifests)
        .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value[1]["container"], "sans7_peak_2_of_2.nxs.ngv");
    let counts = value[1]["integrated_counts"].as_object().unwrap();
    assert_eq!(counts.len(), 4);
    assert_eq!(counts.values().filter_map(serde_json::Value::as_u64).sum::<u64>(), 200);
}
