use std::rc::Rc;

use glam::Mat4;
use raymarch_core::headless::{Command, HeadlessGl, HeadlessQuad};
use raymarch_core::{
    FrameUniforms, GpuContext, ManualClock, Pipeline, PipelineError, Slot, SlotLocation, Stage,
};

const VERTEX: &str = r#"#version 300 es
precision highp float;
in vec4 vs_Pos;
void main() {
    gl_Position = vs_Pos;
}
"#;

const FRAGMENT: &str = r#"#version 300 es
precision highp float;
uniform mat4 u_View;
uniform mat4 u_CamToWorld;
uniform float u_Time;
uniform float u_ScreenWidth;
uniform float u_ScreenHeight;
uniform float u_PixelLenX;
uniform float u_PixelLenY;
out vec4 out_Col;
void main() {
    vec2 uv = gl_FragCoord.xy / vec2(u_ScreenWidth, u_ScreenHeight);
    vec3 dir = (u_CamToWorld * vec4(uv, 1.0, 0.0)).xyz;
    float cone = max(u_PixelLenX, u_PixelLenY);
    out_Col = vec4(dir * cone, sin(u_Time)) + u_View[0];
}
"#;

/// Fragment shader that never touches the pixel footprint.
const FRAGMENT_NO_PIXEL_LEN: &str = r#"#version 300 es
precision highp float;
uniform float u_Time;
out vec4 out_Col;
void main() {
    out_Col = vec4(sin(u_Time));
}
"#;

type Ctx = Rc<GpuContext<HeadlessGl>>;

fn context() -> (Ctx, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(0.0));
    (GpuContext::with_clock(HeadlessGl::new(), Rc::clone(&clock)), clock)
}

fn pipeline(ctx: &Ctx, fragment: &str) -> Pipeline<HeadlessGl> {
    let vs = Rc::new(Stage::vertex(ctx, VERTEX).unwrap());
    let fs = Rc::new(Stage::fragment(ctx, fragment).unwrap());
    Pipeline::new(ctx, &[vs, fs]).unwrap()
}

fn use_program_calls(ctx: &Ctx) -> usize {
    ctx.api().count(|c| matches!(c, Command::UseProgram(_)))
}

#[test]
fn every_slot_resolves() {
    let (ctx, _) = context();
    let full = pipeline(&ctx, FRAGMENT);
    for slot in Slot::ALL {
        assert!(full.slots().is_present(slot), "{} missing", slot.name());
    }

    let partial = pipeline(&ctx, FRAGMENT_NO_PIXEL_LEN);
    assert_eq!(partial.slots().pixel_len_x, SlotLocation::Absent);
    assert_eq!(partial.slots().pixel_len_y, SlotLocation::Absent);
    assert!(partial.slots().time.is_present());
    assert_eq!(
        partial.slots().absent(),
        vec![
            "u_View",
            "u_CamToWorld",
            "u_ScreenWidth",
            "u_ScreenHeight",
            "u_PixelLenX",
            "u_PixelLenY"
        ]
    );
}

#[test]
fn invalid_source_fails_to_compile() {
    let (ctx, _) = context();
    let err = Stage::fragment(&ctx, "#error sdf not implemented").unwrap_err();
    assert!(matches!(err, PipelineError::Compilation { .. }));
    assert!(err.to_string().contains("sdf not implemented"));
    assert_eq!(ctx.api().live_shaders(), 0);
}

#[test]
fn two_fragment_stages_fail_to_link() {
    let (ctx, _) = context();
    let a = Rc::new(Stage::fragment(&ctx, FRAGMENT).unwrap());
    let b = Rc::new(Stage::fragment(&ctx, FRAGMENT_NO_PIXEL_LEN).unwrap());

    let err = Pipeline::new(&ctx, &[a, b]).unwrap_err();
    match err {
        PipelineError::Link { log } => assert!(log.contains("no vertex shader")),
        other => panic!("unexpected error: {other:?}"),
    }
    // The program object is released even though linking failed.
    assert_eq!(ctx.api().live_programs(), 0);
}

#[test]
fn vertex_only_fails_to_link() {
    let (ctx, _) = context();
    let vs = Rc::new(Stage::vertex(&ctx, VERTEX).unwrap());
    assert!(matches!(
        Pipeline::new(&ctx, &[vs]),
        Err(PipelineError::Link { .. })
    ));
}

#[test]
fn stages_from_another_context_are_rejected() {
    let (a, _) = context();
    let (b, _) = context();
    let vs = Rc::new(Stage::vertex(&a, VERTEX).unwrap());
    let fs = Rc::new(Stage::fragment(&a, FRAGMENT).unwrap());
    // Give `b` shaders of its own so the foreign names would resolve there.
    let _other = pipeline(&b, FRAGMENT_NO_PIXEL_LEN);
    b.api().clear_commands();

    match Pipeline::new(&b, &[vs, fs]).unwrap_err() {
        PipelineError::Link { log } => assert!(log.contains("another context")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(b.api().count(|c| matches!(c, Command::CreateProgram(_))), 0);
    assert_eq!(b.api().live_programs(), 1);
    assert_eq!(a.api().live_programs(), 0);
}

#[test]
fn program_allocation_failure() {
    let (ctx, _) = context();
    let vs = Rc::new(Stage::vertex(&ctx, VERTEX).unwrap());
    let fs = Rc::new(Stage::fragment(&ctx, FRAGMENT).unwrap());
    ctx.api().fail_next_allocations(1);
    assert!(matches!(
        Pipeline::new(&ctx, &[vs, fs]),
        Err(PipelineError::Allocation("program"))
    ));
}

#[test]
fn repeated_activation_issues_one_call() {
    let (ctx, _) = context();
    let p = pipeline(&ctx, FRAGMENT);
    ctx.api().clear_commands();

    for _ in 0..10 {
        p.activate();
    }
    p.set_screen_width(800.0);
    p.set_time();
    p.draw(&HeadlessQuad::new(Rc::clone(&ctx)));

    assert_eq!(use_program_calls(&ctx), 1);
}

#[test]
fn alternating_pipelines_reactivate() {
    let (ctx, _) = context();
    let a = pipeline(&ctx, FRAGMENT);
    let b = pipeline(&ctx, FRAGMENT_NO_PIXEL_LEN);
    ctx.api().clear_commands();

    a.activate();
    b.activate();
    a.activate();

    assert_eq!(use_program_calls(&ctx), 3);
    assert_eq!(ctx.active_program(), Some(a.program()));
}

#[test]
fn contexts_do_not_share_active_state() {
    let (ctx_a, _) = context();
    let (ctx_b, _) = context();
    let a = pipeline(&ctx_a, FRAGMENT);
    let b = pipeline(&ctx_b, FRAGMENT);
    // Both headless drivers hand out the same program names.
    assert_eq!(a.program(), b.program());

    a.activate();
    b.activate();
    assert_eq!(use_program_calls(&ctx_a), 1);
    assert_eq!(use_program_calls(&ctx_b), 1);
}

#[test]
fn absent_uniform_is_skipped() {
    let (ctx, _) = context();
    let p = pipeline(&ctx, FRAGMENT_NO_PIXEL_LEN);
    ctx.api().clear_commands();

    for v in [0.0, -1.0, 1e-6, f32::INFINITY, f32::NAN] {
        p.set_pixel_len_x(v);
        p.set_pixel_len_y(v);
    }
    p.set_view_matrix(&Mat4::IDENTITY);

    assert_eq!(
        ctx.api().count(|c| matches!(
            c,
            Command::Uniform1f(..) | Command::UniformMatrix4(..)
        )),
        0
    );
}

#[test]
fn matrices_upload_column_major() {
    let (ctx, _) = context();
    let p = pipeline(&ctx, FRAGMENT);
    let m = Mat4::from_cols_array(&[
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
    ]);
    let loc = p.slots().cam_to_world.get().unwrap();

    p.set_cam_to_world_matrix(&m);

    assert_eq!(
        ctx.api().commands().last(),
        Some(&Command::UniformMatrix4(loc, m.to_cols_array()))
    );
}

#[test]
fn failed_position_bind_still_draws() {
    let (ctx, _) = context();
    let p = pipeline(&ctx, FRAGMENT);
    ctx.api().clear_commands();

    p.draw(&HeadlessQuad::without_positions(Rc::clone(&ctx)));

    let api = ctx.api();
    assert_eq!(api.count(|c| matches!(c, Command::BindElementBuffer(_))), 1);
    assert_eq!(api.count(|c| matches!(c, Command::DrawElements { .. })), 1);
    assert_eq!(api.count(|c| matches!(c, Command::EnableVertexAttribArray(_))), 0);
    assert_eq!(api.count(|c| matches!(c, Command::VertexAttribPointer(..))), 0);
    assert_eq!(api.count(|c| matches!(c, Command::DisableVertexAttribArray(_))), 0);
}

#[test]
fn missing_position_attribute_still_draws() {
    let (ctx, _) = context();
    let vs = Rc::new(Stage::vertex(&ctx, "void main() { gl_Position = vec4(0.0); }").unwrap());
    let fs = Rc::new(Stage::fragment(&ctx, FRAGMENT).unwrap());
    let p = Pipeline::new(&ctx, &[vs, fs]).unwrap();
    assert_eq!(p.slots().position, SlotLocation::Absent);
    ctx.api().clear_commands();

    p.draw(&HeadlessQuad::new(Rc::clone(&ctx)));

    let api = ctx.api();
    // The renderable is not asked to bind positions at all.
    assert_eq!(api.count(|c| matches!(c, Command::BindArrayBuffer(_))), 0);
    assert_eq!(api.count(|c| matches!(c, Command::DrawElements { .. })), 1);
}

#[test]
fn time_tracks_elapsed_wall_clock() {
    let (ctx, clock) = context();
    let p = pipeline(&ctx, FRAGMENT);
    let loc = p.slots().time.get().unwrap();

    let uploaded = |ctx: &Ctx| {
        ctx.api()
            .commands()
            .iter()
            .rev()
            .find_map(|c| match c {
                Command::Uniform1f(l, v) if *l == loc => Some(*v),
                _ => None,
            })
            .unwrap()
    };

    clock.set_ms(12_345.0);
    p.set_time();
    let first = uploaded(&ctx);

    let dt = 750.0;
    clock.advance_ms(dt);
    p.set_time();
    let second = uploaded(&ctx);

    let expected = (dt / 2000.0) as f32;
    assert!((second - first - expected).abs() < 1e-4);
}

#[test]
fn apply_frame_pushes_everything() {
    let (ctx, clock) = context();
    clock.set_ms(2000.0);
    let p = pipeline(&ctx, FRAGMENT);
    ctx.api().clear_commands();

    let frame = FrameUniforms::from_camera(Mat4::IDENTITY, 1.0, 0.1, 640.0, 480.0);
    p.apply_frame(&frame);

    let api = ctx.api();
    assert_eq!(use_program_calls(&ctx), 1);
    assert_eq!(api.count(|c| matches!(c, Command::UniformMatrix4(..))), 2);
    assert_eq!(api.count(|c| matches!(c, Command::Uniform1f(..))), 5);
    let time = p.slots().time.get().unwrap();
    assert_eq!(api.commands().last(), Some(&Command::Uniform1f(time, 1.0)));
}

#[test]
fn stages_outlive_pipeline_when_shared() {
    let (ctx, _) = context();
    let vs = Rc::new(Stage::vertex(&ctx, VERTEX).unwrap());
    let fs = Rc::new(Stage::fragment(&ctx, FRAGMENT).unwrap());

    let first = Pipeline::new(&ctx, &[Rc::clone(&vs), Rc::clone(&fs)]).unwrap();
    drop(first);
    assert_eq!(ctx.api().live_shaders(), 2);

    // The caller's stages can be linked again.
    let second = Pipeline::new(&ctx, &[vs, fs]).unwrap();
    assert_eq!(second.stages().len(), 2);
    drop(second);
    assert_eq!(ctx.api().live_shaders(), 0);
    assert_eq!(ctx.api().live_programs(), 0);
}
