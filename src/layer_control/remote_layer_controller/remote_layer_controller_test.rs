use super::*;
use crate::mock::mock_data_channel::MockDataChannel;
use crate::transport::data_channel::DataChannel;

fn controller() -> (Arc<MockDataChannel>, RemoteLayerController) {
    let dc = Arc::new(MockDataChannel::new("layers"));
    let control = Arc::new(LayerControlChannel::new(
        Arc::clone(&dc) as Arc<dyn DataChannel>
    ));
    (dc, RemoteLayerController::new("remote".to_owned(), Some(control)))
}

#[tokio::test]
async fn test_initial_state() -> Result<()> {
    let (_, controller) = controller();

    let state = controller.state().await;
    assert_eq!(state.video, VideoPreference::None);
    assert!(state.audio);
    assert_eq!(state.framerate, Layer::High);
    assert_eq!(state.video_pre_mute, VideoPreference::High);

    let message = controller.selection_message().await;
    assert_eq!(message.stream_id, "remote");
    assert_eq!(message.video, VideoPreference::None);

    Ok(())
}

#[tokio::test]
async fn test_video_mute_round_trip() -> Result<()> {
    for layer in [Layer::Low, Layer::Medium, Layer::High] {
        let (_, controller) = controller();

        controller.prefer_layer(layer).await?;
        controller.mute(TrackKind::Video).await?;

        let state = controller.state().await;
        assert_eq!(state.video, VideoPreference::None, "testCase: {layer}");
        assert_eq!(state.video_pre_mute, VideoPreference::from(layer));

        controller.unmute(TrackKind::Video).await?;
        assert_eq!(
            controller.state().await.video,
            VideoPreference::from(layer),
            "testCase: {layer}"
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_audio_mute() -> Result<()> {
    let (_, controller) = controller();

    controller.mute(TrackKind::Audio).await?;
    assert!(!controller.state().await.audio);

    controller.unmute(TrackKind::Audio).await?;
    assert!(controller.state().await.audio);

    // video preference is left alone
    assert_eq!(controller.state().await.video, VideoPreference::None);

    let before = controller.state().await;
    controller.mute(TrackKind::Unspecified).await?;
    assert_eq!(controller.state().await, before);

    Ok(())
}

#[tokio::test]
async fn test_transitions_emit_full_selection() -> Result<()> {
    let (dc, controller) = controller();
    dc.open().await;

    controller.prefer_layer(Layer::Medium).await?;
    controller.prefer_framerate(Layer::Low).await?;
    controller.mute(TrackKind::Audio).await?;
    controller.mute(TrackKind::Video).await?;
    controller.unmute(TrackKind::Video).await?;

    assert_eq!(
        dc.sent_messages(),
        vec![
            r#"{"streamId":"remote","video":"medium","audio":true,"framerate":"high"}"#.to_owned(),
            r#"{"streamId":"remote","video":"medium","audio":true,"framerate":"low"}"#.to_owned(),
            r#"{"streamId":"remote","video":"medium","audio":false,"framerate":"low"}"#.to_owned(),
            r#"{"streamId":"remote","video":"none","audio":false,"framerate":"low"}"#.to_owned(),
            r#"{"streamId":"remote","video":"medium","audio":false,"framerate":"low"}"#.to_owned(),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_mute_unmute_before_open_delivers_final_state() -> Result<()> {
    let (dc, controller) = controller();

    controller.prefer_layer(Layer::High).await?;
    controller.mute(TrackKind::Video).await?;
    controller.unmute(TrackKind::Video).await?;
    assert!(dc.sent_messages().is_empty());

    dc.open().await;
    assert_eq!(
        dc.sent_messages(),
        vec![r#"{"streamId":"remote","video":"high","audio":true,"framerate":"high"}"#.to_owned()]
    );

    Ok(())
}

#[tokio::test]
async fn test_without_control_channel() -> Result<()> {
    let controller = RemoteLayerController::new("remote".to_owned(), None);

    controller.prefer_layer(VideoPreference::Low).await?;
    controller.mute(TrackKind::Video).await?;

    let state = controller.state().await;
    assert_eq!(state.video, VideoPreference::None);
    assert_eq!(state.video_pre_mute, VideoPreference::Low);

    Ok(())
}
