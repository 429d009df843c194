//! Capture annotation flow.
//!
//! Mirrors the capture pipeline end to end: persist the image and its
//! thumbnail, run the annotation call, print the caption and store the
//! annotation record.

use std::path::PathBuf;

use anyhow::Context;
use bytes::Bytes;
use snapsight_core::annotate::{AnnotateOutcome, AnnotationGateway, Capability};
use snapsight_store::{AnnotationRecord, CaptureId, Store};
use tokio::task::JoinHandle;

use crate::TRACING_TARGET_ANNOTATE;
use crate::config::{Cli, create_gateway};

type ThumbnailTask = JoinHandle<snapsight_store::Result<PathBuf>>;

/// Runs the capture flow for the configured image and capability.
pub async fn execute(cli: Cli, capability: Capability) -> anyhow::Result<()> {
    let gateway = create_gateway(&cli)?;
    annotate_capture(&gateway, &cli, capability).await
}

/// Runs the capture flow against a ready gateway.
async fn annotate_capture(
    gateway: &AnnotationGateway,
    cli: &Cli,
    capability: Capability,
) -> anyhow::Result<()> {
    let image = tokio::fs::read(&cli.image)
        .await
        .with_context(|| format!("failed to read image '{}'", cli.image.display()))?;
    let image = Bytes::from(image);

    let id = CaptureId::now();
    tracing::info!(
        target: TRACING_TARGET_ANNOTATE,
        capture = %id,
        capability = %capability,
        size = image.len(),
        "processing capture"
    );

    let thumbnail_task = if cli.storage.no_store {
        None
    } else {
        Some(save_capture(cli, &id, &image).await?)
    };

    let annotation = request_annotation(gateway, &image, capability).await;

    // The spawned thumbnail write never outlives the flow, annotation
    // failure included.
    if let Some(task) = thumbnail_task {
        finish_thumbnail(task).await;
    }

    let outcome = annotation?;
    println!("{}", outcome.display_message());

    if !cli.storage.no_store {
        save_annotation(cli, &id, &outcome).await?;
    }

    Ok(())
}

/// Persists the full-size photo and spawns the thumbnail write.
///
/// The thumbnail write runs alongside the annotation call and is
/// joined before the flow returns.
async fn save_capture(cli: &Cli, id: &CaptureId, image: &Bytes) -> anyhow::Result<ThumbnailTask> {
    let path = cli
        .storage
        .photo_store()
        .save(id, image)
        .await
        .context("failed to save photo")?;

    tracing::info!(
        target: TRACING_TARGET_ANNOTATE,
        path = %path.display(),
        "photo saved"
    );

    let thumbnails = cli.storage.thumbnail_store();
    let thumbnail_id = id.clone();
    let thumbnail = image.clone();
    Ok(tokio::spawn(async move {
        thumbnails.save(&thumbnail_id, &thumbnail).await
    }))
}

/// Runs the annotation call, translating failures for the terminal.
async fn request_annotation(
    gateway: &AnnotationGateway,
    image: &Bytes,
    capability: Capability,
) -> anyhow::Result<AnnotateOutcome> {
    match gateway.annotate(image, capability).await {
        Ok(outcome) => Ok(outcome),
        Err(error) if error.is_timeout() => Err(anyhow::Error::new(error)
            .context("annotation timed out, check your network connection and try again")),
        Err(error) => Err(anyhow::Error::new(error).context("annotation failed")),
    }
}

/// Persists the annotation record for a completed capture.
async fn save_annotation(cli: &Cli, id: &CaptureId, outcome: &AnnotateOutcome) -> anyhow::Result<()> {
    let record = AnnotationRecord::from_outcome(outcome);
    let path = cli
        .storage
        .annotation_store()
        .save(id, &record)
        .await
        .context("failed to save annotation record")?;

    tracing::info!(
        target: TRACING_TARGET_ANNOTATE,
        path = %path.display(),
        "annotation record saved"
    );
    Ok(())
}

/// Joins the thumbnail write; a failed thumbnail never fails the run.
async fn finish_thumbnail(task: ThumbnailTask) {
    match task.await {
        Ok(Ok(path)) => tracing::debug!(
            target: TRACING_TARGET_ANNOTATE,
            path = %path.display(),
            "thumbnail saved"
        ),
        Ok(Err(error)) => tracing::warn!(
            target: TRACING_TARGET_ANNOTATE,
            error = %error,
            "thumbnail save failed"
        ),
        Err(error) => tracing::warn!(
            target: TRACING_TARGET_ANNOTATE,
            error = %error,
            "thumbnail task failed"
        ),
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use snapsight_core::mock::{MockAuthenticator, MockBackend};
    use snapsight_core::{Base64Encoder, ErrorKind};

    use super::*;

    fn capture_cli(image: &Path, output: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "snapsight",
            image.to_str().expect("Utf-8 path"),
            "object",
            "--output-dir",
            output.to_str().expect("Utf-8 path"),
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).expect("Valid args")
    }

    fn read_single_entry(dir: &Path) -> Vec<u8> {
        let mut entries = std::fs::read_dir(dir).expect("Readable dir");
        let entry = entries.next().expect("One entry").expect("Dir entry");
        assert!(entries.next().is_none());
        std::fs::read(entry.path()).expect("Readable file")
    }

    #[tokio::test]
    async fn thumbnail_completes_when_annotation_fails() {
        let dir = tempfile::tempdir().expect("Temp dir");
        let image_path = dir.path().join("photo.jpg");
        tokio::fs::write(&image_path, b"raw image bytes")
            .await
            .expect("Image written");
        let output = dir.path().join("captures");

        let cli = capture_cli(&image_path, &output, &[]);
        let gateway = AnnotationGateway::new(
            MockAuthenticator::signed_in(),
            Base64Encoder,
            MockBackend::failing(ErrorKind::RemoteCall),
        );

        let result = annotate_capture(&gateway, &cli, Capability::Object).await;

        assert!(result.is_err());
        assert_eq!(read_single_entry(&output.join("photos")), b"raw image bytes");
        assert_eq!(
            read_single_entry(&output.join("thumbnails")),
            b"raw image bytes"
        );
    }

    #[tokio::test]
    async fn capture_flow_stores_all_three_files() {
        let dir = tempfile::tempdir().expect("Temp dir");
        let image_path = dir.path().join("photo.jpg");
        tokio::fs::write(&image_path, b"raw image bytes")
            .await
            .expect("Image written");
        let output = dir.path().join("captures");

        let cli = capture_cli(&image_path, &output, &["--mock-labels", "Street"]);
        let gateway = create_gateway(&cli).expect("Gateway built");

        annotate_capture(&gateway, &cli, Capability::Object)
            .await
            .expect("Capture annotated");

        assert_eq!(read_single_entry(&output.join("photos")), b"raw image bytes");
        assert_eq!(
            read_single_entry(&output.join("thumbnails")),
            b"raw image bytes"
        );
        let record = read_single_entry(&output.join("annotations"));
        let record = String::from_utf8(record).expect("Utf-8 record");
        assert!(record.contains("Street"));
    }
}
