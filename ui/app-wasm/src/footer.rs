//! Site footer component. Static content rendered into the `custom-footer`
//! host element.

use crate::{dom, icons};

const HOST_SELECTOR: &str = "custom-footer";

pub fn mount() {
    let Some(host) = dom::query(HOST_SELECTOR) else {
        return;
    };
    host.set_inner_html(FOOTER_HTML);
    icons::refresh();
}

const FOOTER_HTML: &str = r#"
<footer>
    <div class="footer-content">
        <div class="footer-section">
            <h3>SafeVoice</h3>
            <p class="footer-blurb">
                Your anonymous sanctuary for mental health support, social
                issues, and student tributes. Speak freely, earn tokens,
                build generational wealth.
            </p>
            <div class="crisis-notice">
                <strong>Crisis Support:</strong> If you're in immediate
                danger, call your local emergency services or suicide
                prevention hotline.
            </div>
        </div>

        <div class="footer-section">
            <h3>Platform</h3>
            <ul class="footer-links">
                <li><a href="./feed.html">Home Feed</a></li>
                <li><a href="./create.html">Create Post</a></li>
                <li><a href="./memorials.html">Memorials</a></li>
                <li><a href="./resources.html">Resources</a></li>
                <li><a href="#">Community Guidelines</a></li>
            </ul>
        </div>

        <div class="footer-section">
            <h3>Support</h3>
            <ul class="footer-links">
                <li><a href="#">Help Center</a></li>
                <li><a href="#">Privacy Policy</a></li>
                <li><a href="#">Terms of Service</a></li>
                <li><a href="#">Contact Us</a></li>
                <li><a href="#">About SafeVoice</a></li>
            </ul>
        </div>

        <div class="footer-section">
            <h3>Connect</h3>
            <ul class="footer-links">
                <li><a href="https://twitter.com/safevoicesocial">Twitter</a></li>
                <li><a href="https://discord.gg/safevoice">Discord</a></li>
                <li><a href="https://github.com/safevoice">GitHub</a></li>
                <li><a href="#">Token Economics</a></li>
            </ul>
        </div>
    </div>

    <div class="footer-bottom">
        <p>&copy; 2024 SafeVoice Social Platform. Built for student mental health.</p>
    </div>
</footer>
"#;
