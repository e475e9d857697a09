use fitroom::ingest::ImageProxy;
use fitroom::{data_url, FitroomError};
use image::{ImageBuffer, Rgb};
use std::io::Cursor;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_pixel(width, height, Rgb([10u8, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

fn proxy(server: &MockServer) -> ImageProxy {
    ImageProxy::builder()
        .base_url(format!("{}/", server.uri()))
        .build()
}

#[tokio::test]
async fn remote_image_is_reencoded_as_png() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("url", "https://shop.example/set front.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(jpeg(5, 7)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = proxy(&server)
        .from_remote_url("https://shop.example/set front.jpg")
        .await
        .unwrap();

    assert_eq!(data_url::mime_type(&url), "image/png");
    let png = data_url::decode(&url).unwrap();
    let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (5, 7));
}

#[tokio::test]
async fn data_url_skips_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let input = "data:image/webp;base64,UklGRg==";
    let out = proxy(&server).from_remote_url(input).await.unwrap();
    assert_eq!(out, input);
}

#[tokio::test]
async fn load_failure_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = proxy(&server)
        .from_remote_url("https://shop.example/gone.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, FitroomError::Api { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn undecodable_body_is_image_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let err = proxy(&server)
        .from_remote_url("https://shop.example/a.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, FitroomError::Image(_)), "{err:?}");
}

#[tokio::test]
async fn load_routes_paths_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("me.png");
    std::fs::write(&file, b"\x89PNG\r\n\x1a\nrest").unwrap();

    let url = fitroom::ingest::load(file.to_str().unwrap()).await.unwrap();
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(data_url::decode(&url).unwrap(), b"\x89PNG\r\n\x1a\nrest");
}
