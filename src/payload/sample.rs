// src/payload/sample.rs
//! Starter documents placed in every new vault

use chrono::{Duration, Utc};

use super::model::{Document, DocumentVersion};

// 1x1 black pixel JPEG
const SAMPLE_IMAGE_DATA_URL: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQEAYABgAAD/2wBDAAIBAQIBAQICAgICAgICAwUDAwMDAwYEBAMFBwYHBwcGBwcICQsJCAgKCAcHCg0KCgsMDAwMBwkODw0MDgsMDAz/2wBDAQICAgMDAwYDAwYMCAcIDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAz/wAARCAABAAEDASIAAhEBAxEB/8QAHwAAAQUBAQEBAQEAAAAAAAAAAAECAwQFBgcICQoL/8QAtRAAAgEDAwIEAwUFBAQAAAF9AQIDAAQRBRIhMUEGE1FhByJxFDKBkaEII0KxwRVS0fAkM2JyggkKFhcYGRolJicoKSo0NTY3ODk6Q0RFRkdISUpTVFVWV1hZWmNkZWZnaGlqc3R1dnd4eXqDhIWGh4iJipKTlJWWl5iZmqKjpKWmp6ipqrKztLW2t7i5usLDxMXGx8jJytLT1NXW19jZ2uHi4+Tl5ufo6erx8vP09fb3+Pn6/8QAHwEAAwEBAQEBAQEBAQAAAAAAAAECAwQFBgcICQoL/8QAtREAAgECBAQDBAcFBAQAAQJ3AAECAxEEBSExBhJBUQdhcRMiMoEIFEKRobHBCSMzUvAVYnLRChYkNOEl8RcYGRomJygpKjU2Nzg5OkNERUZHSElKU1RVVldYWVpjZGVmZ2hpanN0dXZ3eHl6goOEhYaHiImKkpOUlZaXmJmaoqOkpaanqKmqsrO0tba3uLm6wsPExcbHyMnK0tPU1dbX2Nna4uPk5ebn6Onq8vP09fb3+Pn6/9oADAMBAAIRAxEAPwD9/KKKKAP/2Q==";

// "Hello World!" PDF
const SAMPLE_PDF_DATA_URL: &str = "data:application/pdf;base64,JVBERi0xLjcgCiXi48/TIAoxIDAgb2JqIAo8PCAKL1R5cGUgL0NhdGFsb2cgCi9QYWdlcyAyIDAgUiAKPj4gCmVuZG9iagogMiAwIG9iagggCjw8IAovVHlwZSAvUGFnZXMgCi9LaWRzIFsgMyAwIFIgXSAKL0NvdW50IDEgCi9NZWRpYUJveCBbIDAgMCA1ODkuOTIgODQxLjkyIF0gCj4+IAplbmRvYmoKMyAwIG9iagogCjw8IAovVHlwZSAvUGFnZSAKL1BhcmVudCAyIDAgUiAKL1Jlc291cmNlcyA8PCAKL0ZvbnQgPDwgCi9GMSA0IDAgUiAKPj4gCj4+IAovQ29udGVudHMgNSAwIFIgCj4+IAplbmRvYmoKCjQgMCBvYmoKPDwgCi9UeXBlIC9Gb250IAovU3VidHlwZSAvVHlwZTEgCi9CYXNlRm9udCAvSGVsdmV0aWNhIAo+PiAKZW5kb2JqCjUgMCBvYmoKPDwgCi9MZW5ndGggNDggCj4+IApzdHJlYW0gCkJUCjcwIDc1MCUgdGQgCi9GMSAxMiBUZiAKKEhlbGxvIFdvcmxkISkgVGogCkVUCmVuZHN0cmVhbQplbmRvYmoKeHJlZgowIDYKMDAwMDAwMDAwMCA2NTUzNSBmIAowMDAwMDAwMDE5IDAwMDAwIG4gCjAwMDAwMDAwNzkgMDAwMDAgbiAKMDAwMDAwMDE4MyAwMDAwMCBuIAowMDAwMDAwMzE2IDAwMDAwIG4gCjAwMDAwMDA0MDMgMDAwMDAgbiAKdHJhaWxlciAKPDwgCi9TaXplIDYgCi9Sb290IDEgMCBSIAo+PiAKc3RhcnR4cmVmCjQ5MQolJUVPRgo=";

pub fn sample_documents() -> Vec<Document> {
    let now = Utc::now();
    let yesterday = now - Duration::days(1);

    vec![
        Document {
            id: "sample-doc-1".into(),
            name: "Sample PDF Document".into(),
            created_at: yesterday,
            versions: vec![DocumentVersion {
                version_id: "sample-version-1".into(),
                file_data_url: SAMPLE_PDF_DATA_URL.into(),
                file_name: "HelloWorld.pdf".into(),
                file_type: "application/pdf".into(),
                uploaded_at: yesterday,
                version_notes: "This is an initial sample PDF document.".into(),
            }],
            folder_id: None,
        },
        Document {
            id: "sample-doc-2".into(),
            name: "Sample Image".into(),
            created_at: now,
            versions: vec![DocumentVersion {
                version_id: "sample-version-2".into(),
                file_data_url: SAMPLE_IMAGE_DATA_URL.into(),
                file_name: "Pixel.jpg".into(),
                file_type: "image/jpeg".into(),
                uploaded_at: now,
                version_notes: "This is a sample image file.".into(),
            }],
            folder_id: None,
        },
    ]
}
