use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, Pat};

/// Time a system when the `perf_stats` feature is enabled.
///
/// The function body is wrapped in a guard that logs the elapsed time when it
/// is dropped. With `perf_stats` disabled the guard is compiled out entirely.
///
/// # Frame detection
/// If the function takes a parameter named `frame` whose type mentions
/// `FrameCounter`, the guard also logs every 60 frames regardless of duration,
/// so a steady-state frame cost shows up in the log even when it is fast.
///
/// # Example
/// ```ignore
/// #[profile(8)]  // log when a call exceeds 8 ms
/// pub fn render_frame(mut state: ResMut<RenderState>, frame: Res<FrameCounter>) {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        attr.to_string().trim().parse().unwrap_or(1)
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let has_frame_param = sig.inputs.iter().any(|arg| {
        if let FnArg::Typed(pat_type) = arg {
            if let Pat::Ident(pat_ident) = &*pat_type.pat {
                if pat_ident.ident == "frame" {
                    let ty = &pat_type.ty;
                    let type_str = quote!(#ty).to_string();
                    return type_str.contains("FrameCounter");
                }
            }
        }
        false
    });

    let guard_def = if has_frame_param {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
                frame_value: u64,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms || self.frame_value % 60 == 0 {
                        bevy::prelude::info!("[PERF] {} (frame {}): {:?}", self.name, self.frame_value, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
                frame_value: frame.0,
            }
        }
    } else {
        quote! {
            struct ProfileGuard {
                name: &'static str,
                start: std::time::Instant,
            }
            impl Drop for ProfileGuard {
                fn drop(&mut self) {
                    let elapsed = self.start.elapsed();
                    if elapsed.as_millis() > #threshold_ms {
                        bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
                    }
                }
            }
            ProfileGuard {
                name: #fn_name_str,
                start: std::time::Instant::now(),
            }
        }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                #guard_def
            };

            #block
        }
    };

    output.into()
}
